use crate::sample::ColorSample;
use std::fmt;

/// The outcome of counting the colors of one image.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stats {
    file_name: String,
    width: u32,
    height: u32,
    candidates: usize,
    colors: Vec<ColorSample>,
}

impl Stats {
    pub(crate) fn new(file_name: String, (width, height): (u32, u32), candidates: usize, colors: Vec<ColorSample>) -> Self {
        Self {
            file_name,
            width,
            height,
            candidates,
            colors,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Colors that passed the frequency filter, before similar ones were merged.
    pub fn candidate_count(&self) -> usize {
        self.candidates
    }

    pub fn dominant_count(&self) -> usize {
        self.colors.len()
    }

    pub fn colors(&self) -> &[ColorSample] {
        &self.colors
    }

    pub fn rendered_colors(&self) -> String {
        let colors: Vec<String> = self.colors.iter().map(ToString::to_string).collect();
        format!("[{}]", colors.join(", "))
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Filename: {} {}x{}", self.file_name, self.width, self.height)?;
        writeln!(f, "Candidates: {}", self.candidates)?;
        writeln!(f, "Dominant Colors: {}", self.dominant_count())?;
        writeln!(f, "Colors: {}", self.rendered_colors())
    }
}
