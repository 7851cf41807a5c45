//! 局部描述子：网格 + 梯度方向直方图
//!
//! Each keyframe is resized to a square, split into `grid x grid` cells and
//! every cell with enough gradient energy becomes one descriptor: four 2x2
//! sub-blocks, each an 8-bin orientation histogram weighted by gradient
//! magnitude, concatenated and L2-normalized.

use crate::core::config::VisualConfig;
use crate::core::video::Frame;
use std::f32::consts::PI;

pub const ORIENTATION_BINS: usize = 8;
pub const DESCRIPTOR_LEN: usize = ORIENTATION_BINS * 4;

pub type Descriptor = [f32; DESCRIPTOR_LEN];

#[derive(Debug, Clone)]
pub struct DescriptorExtractor {
    frame_size: u32,
    grid: u32,
    min_cell_energy: f32,
}

impl DescriptorExtractor {
    pub fn new(config: &VisualConfig) -> Self {
        Self {
            frame_size: config.descriptor_frame_size,
            grid: config.descriptor_grid.max(1),
            min_cell_energy: config.min_cell_energy,
        }
    }

    pub fn extract(&self, frame: &Frame) -> Vec<Descriptor> {
        let size = self.frame_size as usize;
        let resized = frame.resize_to(self.frame_size, self.frame_size);
        let (magnitude, orientation) = gradients(&resized.data, size, size);

        let cell = size / self.grid as usize;
        if cell < 2 {
            return Vec::new();
        }
        let half = cell / 2;

        let mut descriptors = Vec::new();
        for gy in 0..self.grid as usize {
            for gx in 0..self.grid as usize {
                let mut descriptor = [0f32; DESCRIPTOR_LEN];
                let mut energy = 0f32;

                for y in gy * cell..(gy + 1) * cell {
                    for x in gx * cell..(gx + 1) * cell {
                        let idx = y * size + x;
                        let m = magnitude[idx];
                        energy += m;

                        let sub_y = ((y - gy * cell) / half).min(1);
                        let sub_x = ((x - gx * cell) / half).min(1);
                        let block = sub_y * 2 + sub_x;
                        descriptor[block * ORIENTATION_BINS + orientation[idx]] += m;
                    }
                }

                // 平坦区域不产生描述子
                if energy / ((cell * cell) as f32) < self.min_cell_energy {
                    continue;
                }
                if normalize(&mut descriptor) {
                    descriptors.push(descriptor);
                }
            }
        }
        descriptors
    }
}

/// Central-difference gradient magnitude and orientation bin per pixel.
fn gradients(data: &[u8], width: usize, height: usize) -> (Vec<f32>, Vec<usize>) {
    let mut magnitude = vec![0f32; width * height];
    let mut orientation = vec![0usize; width * height];
    if data.len() < width * height {
        return (magnitude, orientation);
    }

    for y in 0..height {
        for x in 0..width {
            let left = data[y * width + x.saturating_sub(1)] as f32;
            let right = data[y * width + (x + 1).min(width - 1)] as f32;
            let up = data[y.saturating_sub(1) * width + x] as f32;
            let down = data[(y + 1).min(height - 1) * width + x] as f32;

            let gx = right - left;
            let gy = down - up;
            let idx = y * width + x;
            magnitude[idx] = (gx * gx + gy * gy).sqrt();

            let angle = gy.atan2(gx) + PI;
            let bin = (angle / (2.0 * PI) * ORIENTATION_BINS as f32) as usize;
            orientation[idx] = bin.min(ORIENTATION_BINS - 1);
        }
    }
    (magnitude, orientation)
}

fn normalize(descriptor: &mut Descriptor) -> bool {
    let norm = descriptor.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm <= f32::EPSILON {
        return false;
    }
    for v in descriptor.iter_mut() {
        *v /= norm;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> DescriptorExtractor {
        DescriptorExtractor::new(&VisualConfig {
            descriptor_frame_size: 32,
            descriptor_grid: 4,
            ..Default::default()
        })
    }

    #[test]
    fn test_flat_frame_has_no_descriptors() {
        let frame = Frame::new(64, 64, vec![90u8; 64 * 64], 0);
        assert!(extractor().extract(&frame).is_empty());
    }

    #[test]
    fn test_textured_frame_descriptors_unit_norm() {
        let data: Vec<u8> = (0..64 * 64)
            .map(|i| if (i % 64 / 8 + i / 64 / 8) % 2 == 0 { 0 } else { 255 })
            .collect();
        let frame = Frame::new(64, 64, data, 0);

        let descriptors = extractor().extract(&frame);
        assert!(!descriptors.is_empty());
        for d in &descriptors {
            let norm = d.iter().map(|v| v * v).sum::<f32>().sqrt();
            assert!((norm - 1.0).abs() < 1e-4);
            assert!(d.iter().all(|v| *v >= 0.0));
        }
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let data: Vec<u8> = (0..48 * 48).map(|i| (i * 7 % 251) as u8).collect();
        let frame = Frame::new(48, 48, data, 0);
        assert_eq!(extractor().extract(&frame), extractor().extract(&frame));
    }
}
