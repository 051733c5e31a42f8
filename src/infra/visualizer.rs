// ============================================================
// Layer 6 — Prediction Visualizer
// ============================================================
// The inspection half of the workflow: after inference we want
// to SEE the image the model looked at next to the probability
// it assigned each digit, not just a bare predicted label.
//
// Two output targets:
//   - Terminal: ASCII rendering of the digit plus a horizontal
//     probability bar chart, printed by the predict use case.
//   - Files:    grayscale PNGs of the digit (upscaled so 28×28
//     is actually visible) and of the probability bars.
//
// Pixel-to-PNG writing follows the Burn mnist example's image
// helper: build a GrayImage, sample with nearest neighbour,
// create the output directory if needed.
//
// Reference: image crate documentation
//            Rust Book §12 (I/O and File Handling)

use anyhow::{Context, Result};
use image::{GrayImage, Luma};
use std::{fs, path::PathBuf};

use crate::domain::digit_image::{DigitImage, IMAGE_HEIGHT, IMAGE_WIDTH};
use crate::domain::prediction::{Prediction, NUM_CLASSES};

/// Upscale factor for the digit PNG: 28×28 → 224×224
const PNG_SCALE: u32 = 8;

/// Width of the terminal probability bars in characters
const BAR_WIDTH: usize = 40;

/// Intensity ramp for terminal rendering, darkest to brightest
const SHADES: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Writes digit and probability renderings into an output directory.
pub struct Visualizer {
    /// Directory the PNG files are written to
    out_dir: PathBuf,
}

impl Visualizer {
    /// Create a new Visualizer.
    /// Creates the output directory if it doesn't already exist.
    pub fn new(out_dir: impl Into<String>) -> Self {
        let out_dir = PathBuf::from(out_dir.into());
        fs::create_dir_all(&out_dir).ok();
        Self { out_dir }
    }

    /// Save the digit as an upscaled grayscale PNG.
    /// Returns the path of the written file.
    pub fn save_digit_png(&self, image: &DigitImage, name: &str) -> Result<PathBuf> {
        let width  = IMAGE_WIDTH as u32 * PNG_SCALE;
        let height = IMAGE_HEIGHT as u32 * PNG_SCALE;
        let mut png = GrayImage::new(width, height);

        // Nearest-neighbour upscale: every output pixel maps back
        // to the source pixel it falls inside
        for x in 0..width {
            for y in 0..height {
                let src_x = (x / PNG_SCALE) as usize;
                let src_y = (y / PNG_SCALE) as usize;
                let value = image.pixel(src_x, src_y).clamp(0.0, 255.0) as u8;
                png.put_pixel(x, y, Luma([value]));
            }
        }

        let path = self.out_dir.join(format!("{name}.png"));
        png.save(&path)
            .with_context(|| format!("Cannot write digit image to '{}'", path.display()))?;

        tracing::debug!("Wrote digit rendering to '{}'", path.display());
        Ok(path)
    }

    /// Save the class probabilities as a grayscale bar chart PNG.
    /// One column per digit, bar height proportional to probability.
    pub fn save_probability_png(&self, prediction: &Prediction, name: &str) -> Result<PathBuf> {
        const COLUMN: u32 = 20; // bar width + gap per class
        const CHART_HEIGHT: u32 = 100;

        let width   = NUM_CLASSES as u32 * COLUMN;
        let mut png = GrayImage::new(width, CHART_HEIGHT);

        for (digit, &prob) in prediction.probabilities.iter().enumerate() {
            let bar_height = (prob * CHART_HEIGHT as f64).round() as u32;
            let x_start    = digit as u32 * COLUMN;

            // Leave a 2px gap between bars; fill from the bottom up
            for x in x_start..(x_start + COLUMN - 2) {
                for y in (CHART_HEIGHT - bar_height.min(CHART_HEIGHT))..CHART_HEIGHT {
                    png.put_pixel(x, y, Luma([255]));
                }
            }
        }

        let path = self.out_dir.join(format!("{name}.png"));
        png.save(&path)
            .with_context(|| format!("Cannot write probability chart to '{}'", path.display()))?;

        tracing::debug!("Wrote probability chart to '{}'", path.display());
        Ok(path)
    }
}

/// Render the digit as 28 lines of ASCII art for the terminal.
/// Brighter pixels map to denser characters.
pub fn ascii_digit(image: &DigitImage) -> String {
    let mut out = String::with_capacity((IMAGE_WIDTH + 1) * IMAGE_HEIGHT);

    for y in 0..IMAGE_HEIGHT {
        for x in 0..IMAGE_WIDTH {
            let intensity = image.pixel(x, y).clamp(0.0, 255.0) / 255.0;
            // Map [0, 1] onto the shade ramp
            let shade = (intensity * (SHADES.len() - 1) as f32).round() as usize;
            out.push(SHADES[shade]);
        }
        out.push('\n');
    }

    out
}

/// Render the class probabilities as a horizontal bar chart.
///
/// One line per digit:
///   digit 7  ████████████████████████████████  97.3%  ← predicted
pub fn probability_chart(prediction: &Prediction) -> String {
    let predicted = prediction.predicted_class();
    let mut out   = String::new();

    for (digit, &prob) in prediction.probabilities.iter().enumerate() {
        let filled = (prob * BAR_WIDTH as f64).round() as usize;
        let marker = if digit == predicted { "  ← predicted" } else { "" };

        out.push_str(&format!(
            "digit {}  {:<width$}  {:>5.1}%{}\n",
            digit,
            "█".repeat(filled),
            prob * 100.0,
            marker,
            width = BAR_WIDTH,
        ));
    }

    out
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::digit_image::IMAGE_PIXELS;

    fn checkered() -> DigitImage {
        let pixels = (0..IMAGE_PIXELS)
            .map(|i| if i % 2 == 0 { 0.0 } else { 255.0 })
            .collect();
        DigitImage::new(pixels, None)
    }

    fn mostly_three() -> Prediction {
        let mut probs = vec![0.02; NUM_CLASSES];
        probs[3] = 0.82;
        Prediction::new(probs)
    }

    #[test]
    fn test_ascii_digit_dimensions() {
        let art   = ascii_digit(&checkered());
        let lines: Vec<&str> = art.lines().collect();

        assert_eq!(lines.len(), IMAGE_HEIGHT);
        assert!(lines.iter().all(|l| l.chars().count() == IMAGE_WIDTH));
    }

    #[test]
    fn test_ascii_digit_uses_shade_extremes() {
        let art = ascii_digit(&checkered());
        // Black pixels render as spaces, white pixels as '@'
        assert!(art.contains(' '));
        assert!(art.contains('@'));
    }

    #[test]
    fn test_probability_chart_has_one_line_per_class() {
        let chart = probability_chart(&mostly_three());
        assert_eq!(chart.lines().count(), NUM_CLASSES);
    }

    #[test]
    fn test_probability_chart_marks_predicted_class() {
        let chart = probability_chart(&mostly_three());
        let marked: Vec<&str> = chart
            .lines()
            .filter(|l| l.contains("← predicted"))
            .collect();

        assert_eq!(marked.len(), 1);
        assert!(marked[0].starts_with("digit 3"));
    }

    #[test]
    fn test_probability_chart_bar_lengths_scale() {
        let chart = probability_chart(&mostly_three());
        let bar_len = |line: &str| line.chars().filter(|c| *c == '█').count();

        let lines: Vec<&str> = chart.lines().collect();
        // 0.82 * 40 ≈ 33 blocks vs 0.02 * 40 ≈ 1 block
        assert!(bar_len(lines[3]) > bar_len(lines[0]));
        assert_eq!(bar_len(lines[3]), 33);
        assert_eq!(bar_len(lines[0]), 1);
    }

    #[test]
    fn test_png_files_are_written() {
        let dir = std::env::temp_dir().join("digit-classifier-viz-test");
        let _   = std::fs::remove_dir_all(&dir);

        let viz   = Visualizer::new(dir.to_str().unwrap());
        let digit = viz.save_digit_png(&checkered(), "digit").unwrap();
        let chart = viz.save_probability_png(&mostly_three(), "probs").unwrap();

        assert!(digit.exists());
        assert!(chart.exists());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
