//! Weighted k-means over distinct RGB colors.

use std::collections::HashMap;

use crate::color::{nearest_index, Color};

/// One distinct input color with its weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Sample {
    pub color: Color,
    pub count: usize,
    pub first_seen: usize,
}

/// Collapse the input into distinct opaque colors in first-seen order.
pub(crate) fn distinct_colors(colors: &[Color]) -> Vec<Sample> {
    let mut slots: HashMap<[u8; 3], usize> = HashMap::new();
    let mut samples: Vec<Sample> = Vec::new();
    for (i, c) in colors.iter().enumerate() {
        let key = c.to_bytes();
        match slots.get(&key) {
            Some(&slot) => samples[slot].count += 1,
            None => {
                slots.insert(key, samples.len());
                samples.push(Sample {
                    color: c.opaque(),
                    count: 1,
                    first_seen: i,
                });
            }
        }
    }
    samples
}

struct Center {
    mean: [f64; 3],
    sum: [f64; 3],
    count: usize,
}

impl Center {
    fn new(color: Color) -> Self {
        Self {
            mean: [color.r as f64, color.g as f64, color.b as f64],
            sum: [0.0; 3],
            count: 0,
        }
    }

    fn color(&self) -> Color {
        Color::rgb(
            self.mean[0].clamp(0.0, 255.0).round() as u8,
            self.mean[1].clamp(0.0, 255.0).round() as u8,
            self.mean[2].clamp(0.0, 255.0).round() as u8,
        )
    }
}

/// Cluster `samples` into at most `k` centroids.
///
/// Seeds are the `k` most frequent samples, ties broken by first
/// occurrence. Each round assigns every sample to its nearest rounded
/// centroid and recomputes centroids as weighted means; a centroid that
/// loses all its samples keeps its previous position. Stops when no
/// assignment changes or after `max_iterations` rounds.
///
/// Returns the rounded centroids in seed order (may contain duplicates).
pub(crate) fn kmeans(samples: &[Sample], k: usize, max_iterations: usize) -> Vec<Color> {
    if samples.is_empty() || k == 0 {
        return Vec::new();
    }

    let mut seeds: Vec<&Sample> = samples.iter().collect();
    seeds.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.first_seen.cmp(&b.first_seen))
    });
    let mut centers: Vec<Center> = seeds
        .iter()
        .take(k)
        .map(|s| Center::new(s.color))
        .collect();

    let mut labels = vec![usize::MAX; samples.len()];

    for _ in 0..max_iterations {
        let palette: Vec<Color> = centers.iter().map(Center::color).collect();

        let mut changed = 0usize;
        for (label, sample) in labels.iter_mut().zip(samples) {
            let nearest = nearest_index(sample.color, &palette);
            if *label != nearest {
                *label = nearest;
                changed += 1;
            }
        }

        if changed == 0 {
            break;
        }

        for center in &mut centers {
            center.sum = [0.0; 3];
            center.count = 0;
        }
        for (&label, sample) in labels.iter().zip(samples) {
            let center = &mut centers[label];
            let w = sample.count as f64;
            center.sum[0] += sample.color.r as f64 * w;
            center.sum[1] += sample.color.g as f64 * w;
            center.sum[2] += sample.color.b as f64 * w;
            center.count += sample.count;
        }
        for center in &mut centers {
            if center.count > 0 {
                let n = center.count as f64;
                center.mean = [center.sum[0] / n, center.sum[1] / n, center.sum[2] / n];
            }
        }
    }

    centers.iter().map(Center::color).collect()
}
