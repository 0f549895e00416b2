use crate::templates::TemplateBank;
use image::imageops::{resize, FilterType};
use image::GrayImage;
use log::debug;

/// Minimum normalized cross-correlation for a template match to count.
/// Below this the glyph is reported unmatched rather than guessed; a
/// wrong number read confidently costs a player more than a cell
/// flagged for a retake.
pub const MATCH_THRESHOLD: f32 = 0.60;

/// Score a glyph against every template and pick the best match.
///
/// Templates are scanned in ascending digit order and only a strictly
/// greater score replaces the incumbent, so the lowest digit wins a
/// tie. A template whose size differs from the glyph is resized first.
/// Returns None when the bank is empty or the best score falls below
/// [MATCH_THRESHOLD].
pub fn match_digit(glyph: &GrayImage, bank: &TemplateBank) -> Option<(u8, f32)> {
    let mut best: Option<(u8, f32)> = None;
    for (&digit, template) in bank {
        let score = if template.dimensions() == glyph.dimensions() {
            correlation(glyph, template)
        } else {
            let fitted = resize(template, glyph.width(), glyph.height(), FilterType::Triangle);
            correlation(glyph, &fitted)
        };
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((digit, score));
        }
    }
    let (digit, score) = best?;
    if score < MATCH_THRESHOLD {
        debug!("best match {} scored {:.3}, below threshold", digit, score);
        return None;
    }
    Some((digit, score))
}

/// Zero-mean, unit-variance normalized cross-correlation of two equally
/// sized images. 1.0 is a perfect match, 0.0 is uncorrelated and -1.0 is
/// an inverted match.
fn correlation(a: &GrayImage, b: &GrayImage) -> f32 {
    let pixels = (a.width() * a.height()) as f32;
    if pixels == 0.0 {
        return 0.0;
    }
    let (mean_a, dev_a) = stats(a);
    let (mean_b, dev_b) = stats(b);
    let mut sum = 0.0;
    for (pa, pb) in a.pixels().zip(b.pixels()) {
        sum += (pa[0] as f32 - mean_a) / dev_a * ((pb[0] as f32 - mean_b) / dev_b);
    }
    sum / pixels
}

/// Population mean and standard deviation, the deviation padded by a
/// small epsilon so a flat image cannot divide by zero.
fn stats(img: &GrayImage) -> (f32, f32) {
    let pixels = (img.width() * img.height()) as f32;
    let mean = img.pixels().map(|p| p[0] as f32).sum::<f32>() / pixels;
    let variance = img
        .pixels()
        .map(|p| {
            let d = p[0] as f32 - mean;
            d * d
        })
        .sum::<f32>()
        / pixels;
    (mean, variance.sqrt() + 1e-6)
}
