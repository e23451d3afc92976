use crate::sample::ColorSample;

/// Greedily merges colors closer than `threshold` to each other, keeping the more frequent one of every close pair.
///
/// Every color in turn is used as a pivot and compared against all colors that haven't been merged away yet. When
/// the pivot is more frequent than a close color, that color is marked as a duplicate. Otherwise the pivot itself is
/// marked, but it still keeps going through the rest of the colors and may knock out less frequent ones after that.
/// Because of this the result depends on the input order, and colors can disappear through a chain of close
/// neighbours even if they aren't close to any of the survivors.
///
/// Returns the colors that weren't marked, in their original order.
pub fn merge_colors(mut colors: Vec<ColorSample>, bit_depth: u8, threshold: f64) -> Vec<ColorSample> {
    // indices into `colors` that haven't been merged away yet, as far as the scan has noticed
    let mut working: Vec<usize> = (0..colors.len()).collect();

    for pivot in 0..colors.len() {
        if colors[pivot].is_duplicate() {
            continue;
        }

        working.retain(|&candidate| {
            if colors[candidate].is_duplicate() {
                return false;
            }

            if candidate != pivot && colors[pivot].distance(&colors[candidate], bit_depth) < threshold {
                if colors[pivot].frequency() > colors[candidate].frequency() {
                    colors[candidate].mark_duplicate();
                    return false;
                }

                colors[pivot].mark_duplicate();
            }

            true
        });
    }

    colors.retain(|color| !color.is_duplicate());
    colors
}
