use crate::core::error::{Result, SummaryError};
use image::GrayImage;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

static FRAME_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^image-(\d+)\.jpg$").expect("frame name pattern is valid")
});

/// 每秒一帧的灰度帧
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>, // 灰度（亮度）平面
    pub video_second: u32,
}

impl Frame {
    pub fn new(width: u32, height: u32, data: Vec<u8>, video_second: u32) -> Self {
        Self {
            width,
            height,
            data,
            video_second,
        }
    }

    pub fn from_gray_image(image: GrayImage, video_second: u32) -> Self {
        let (width, height) = image.dimensions();
        Self::new(width, height, image.into_raw(), video_second)
    }

    /// Loads `image-<second>.jpg` as luma.
    pub fn open(path: &Path) -> Result<Self> {
        let second = Self::second_from_path(path).ok_or_else(|| {
            SummaryError::MissingFrames(path.to_path_buf())
        })?;
        let image = image::open(path)?.to_luma8();
        Ok(Self::from_gray_image(image, second))
    }

    /// Video second encoded in a frame file name, `None` for foreign files.
    pub fn second_from_path(path: &Path) -> Option<u32> {
        let name = path.file_name()?.to_str()?;
        FRAME_NAME
            .captures(name)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse().ok())
    }

    pub fn pixel_count(&self) -> usize {
        (self.width * self.height) as usize
    }

    pub fn to_gray_image(&self) -> Option<GrayImage> {
        GrayImage::from_raw(self.width, self.height, self.data.clone())
    }

    pub fn resize_to(&self, target_width: u32, target_height: u32) -> Frame {
        let resized = match self.to_gray_image() {
            Some(img) => image::imageops::resize(
                &img,
                target_width,
                target_height,
                image::imageops::FilterType::Triangle,
            ),
            // 数据长度不匹配时返回全黑帧
            None => GrayImage::new(target_width, target_height),
        };

        Frame {
            width: target_width,
            height: target_height,
            data: resized.into_raw(),
            video_second: self.video_second,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_frame_creation() {
        let data = vec![255u8; 100 * 100];
        let frame = Frame::new(100, 100, data, 30);

        assert_eq!(frame.width, 100);
        assert_eq!(frame.height, 100);
        assert_eq!(frame.pixel_count(), 10000);
        assert_eq!(frame.video_second, 30);
    }

    #[test]
    fn test_frame_resize() {
        let data = vec![255u8; 100 * 100];
        let frame = Frame::new(100, 100, data, 0);
        let resized = frame.resize_to(32, 32);

        assert_eq!(resized.width, 32);
        assert_eq!(resized.height, 32);
        assert_eq!(resized.data.len(), 32 * 32);
        assert!(resized.data.iter().all(|&v| v == 255));
    }

    #[test]
    fn test_second_from_path() {
        assert_eq!(
            Frame::second_from_path(&PathBuf::from("/frames/v1/image-42.jpg")),
            Some(42)
        );
        assert_eq!(Frame::second_from_path(&PathBuf::from("image-0.jpg")), Some(0));
        assert_eq!(Frame::second_from_path(&PathBuf::from("thumb-3.jpg")), None);
        assert_eq!(Frame::second_from_path(&PathBuf::from("image-3.png")), None);
    }
}
