//! Peak detection for one-dimensional signals
//!
//! Mirrors the semantics of scipy's `find_peaks`:
//! - Local maxima, with flat plateaus resolved to their middle sample
//! - Minimum height filter
//! - Minimum distance filter, keeping the higher peak of a close pair
//! - Minimum prominence filter
//! - Minimum width filter, measured at half prominence
//!
//! Filters run in that order, each on the survivors of the previous one.

use crate::error::{Result, SigEditError};
use crate::types::PeakParams;

/// Relative height at which peak widths are measured
pub const WIDTH_REL_HEIGHT: f64 = 0.5;

/// Prominence of a single peak and the bases it was measured against
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prominence {
    pub value: f64,
    pub left_base: usize,
    pub right_base: usize,
}

/// Width of a single peak with interpolated crossing positions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakWidth {
    pub width: f64,
    pub height: f64,
    pub left_ip: f64,
    pub right_ip: f64,
}

/// Find peak indices in `x` satisfying every set option of `params`
pub fn find_peaks(x: &[f64], params: &PeakParams) -> Result<Vec<usize>> {
    validate(params)?;

    let mut peaks = local_maxima(x);

    if let Some(min_height) = params.height {
        peaks.retain(|&p| x[p] >= min_height);
    }

    if let Some(distance) = params.distance {
        peaks = select_by_distance(x, &peaks, distance.ceil() as usize);
    }

    if params.prominence.is_some() || params.width.is_some() {
        let prominences = peak_prominences(x, &peaks);

        let mut keep: Vec<bool> = match params.prominence {
            Some(min) => prominences.iter().map(|p| p.value >= min).collect(),
            None => vec![true; peaks.len()],
        };

        if let Some(min_width) = params.width {
            for (i, peak) in peaks.iter().enumerate() {
                if keep[i] {
                    let w = peak_width(x, *peak, &prominences[i], WIDTH_REL_HEIGHT);
                    keep[i] = w.width >= min_width;
                }
            }
        }

        peaks = peaks
            .into_iter()
            .zip(keep)
            .filter_map(|(p, k)| k.then_some(p))
            .collect();
    }

    Ok(peaks)
}

fn validate(params: &PeakParams) -> Result<()> {
    for name in PeakParams::OPTION_NAMES {
        if let Some(v) = params.get(name) {
            if !v.is_finite() {
                return Err(SigEditError::Detection(format!(
                    "`{}` must be a finite number, got {}",
                    name, v
                )));
            }
        }
    }
    if let Some(distance) = params.distance {
        if distance < 1.0 {
            return Err(SigEditError::Detection(
                "`distance` must be greater or equal to 1".to_string(),
            ));
        }
    }
    Ok(())
}

/// Indices of all local maxima; plateaus report their middle sample
pub fn local_maxima(x: &[f64]) -> Vec<usize> {
    let mut peaks = Vec::new();
    let n = x.len();
    if n < 3 {
        return peaks;
    }

    let mut i = 1;
    while i < n - 1 {
        if x[i - 1] < x[i] {
            let mut ahead = i + 1;
            while ahead < n - 1 && x[ahead] == x[i] {
                ahead += 1;
            }
            if x[ahead] < x[i] {
                let left_edge = i;
                let right_edge = ahead - 1;
                peaks.push((left_edge + right_edge) / 2);
                i = ahead;
            }
        }
        i += 1;
    }
    peaks
}

/// Keep peaks at least `distance` samples apart, preferring higher ones
pub fn select_by_distance(x: &[f64], peaks: &[usize], distance: usize) -> Vec<usize> {
    let n = peaks.len();
    let mut keep = vec![true; n];

    // Ascending by height; ties keep index order, so later peaks win ties
    let mut by_priority: Vec<usize> = (0..n).collect();
    by_priority.sort_by(|&a, &b| {
        x[peaks[a]]
            .partial_cmp(&x[peaks[b]])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    for &j in by_priority.iter().rev() {
        if !keep[j] {
            continue;
        }
        let mut k = j;
        while k > 0 && peaks[j] - peaks[k - 1] < distance {
            keep[k - 1] = false;
            k -= 1;
        }
        let mut k = j + 1;
        while k < n && peaks[k] - peaks[j] < distance {
            keep[k] = false;
            k += 1;
        }
    }

    peaks
        .iter()
        .zip(keep)
        .filter_map(|(&p, k)| k.then_some(p))
        .collect()
}

/// Prominence of each peak, searching the whole signal for bases
pub fn peak_prominences(x: &[f64], peaks: &[usize]) -> Vec<Prominence> {
    peaks
        .iter()
        .map(|&peak| {
            let top = x[peak];

            let mut left_base = peak;
            let mut left_min = top;
            let mut i = peak;
            loop {
                if x[i] > top {
                    break;
                }
                if x[i] < left_min {
                    left_min = x[i];
                    left_base = i;
                }
                if i == 0 {
                    break;
                }
                i -= 1;
            }

            let mut right_base = peak;
            let mut right_min = top;
            for (j, &v) in x.iter().enumerate().skip(peak) {
                if v > top {
                    break;
                }
                if v < right_min {
                    right_min = v;
                    right_base = j;
                }
            }

            Prominence {
                value: top - left_min.max(right_min),
                left_base,
                right_base,
            }
        })
        .collect()
}

/// Width of a peak at `rel_height` of its prominence
pub fn peak_width(x: &[f64], peak: usize, prominence: &Prominence, rel_height: f64) -> PeakWidth {
    let height = x[peak] - prominence.value * rel_height;

    let mut i = peak;
    while prominence.left_base < i && height < x[i] {
        i -= 1;
    }
    let mut left_ip = i as f64;
    if x[i] < height && i + 1 < x.len() {
        left_ip += (height - x[i]) / (x[i + 1] - x[i]);
    }

    let mut i = peak;
    while i < prominence.right_base && height < x[i] {
        i += 1;
    }
    let mut right_ip = i as f64;
    if x[i] < height && i > 0 {
        right_ip -= (height - x[i]) / (x[i - 1] - x[i]);
    }

    PeakWidth {
        width: right_ip - left_ip,
        height,
        left_ip,
        right_ip,
    }
}
