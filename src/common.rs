use bytemuck::{Pod, Zeroable};

#[derive(Pod, Zeroable, Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[repr(C)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };
    pub const WHITE: Color = Color { r: 0xFF, g: 0xFF, b: 0xFF };

    pub const fn new(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b }
    }
}


/// Row-major RGB raster. Row 0 is the top row of the picture.
///
/// `Image::default()` is the empty 0x0 image, which doubles as the "nothing decoded" value
/// returned by [`crate::bmp::decode_or_empty`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Image {
    width: usize,
    height: usize,
    data: Box<[Color]>
}

impl Image {
    pub fn new(width: usize, height: usize, fill: Color) -> Image {
        Image { width, height, data: vec![fill; width*height].into_boxed_slice() }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn row(&self, y: usize) -> &[Color] {
        assert!(y < self.height, "row {y} out of range for height {}", self.height);
        let start = y*self.width;
        &self.data[start..start+self.width]
    }

    pub fn row_mut(&mut self, y: usize) -> &mut [Color] {
        assert!(y < self.height, "row {y} out of range for height {}", self.height);
        let start = y*self.width;
        &mut self.data[start..start+self.width]
    }

    pub fn pixel(&self, x: usize, y: usize) -> Color {
        self.row(y)[x]
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, color: Color) {
        self.row_mut(y)[x] = color;
    }

    pub fn pixels(&self) -> &[Color] {
        &self.data
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_color_layout() {
        assert_eq!(std::mem::size_of::<Color>(), 3);
        assert_eq!(bytemuck::bytes_of(&Color::new(1, 2, 3)), &[1, 2, 3]);
    }

    #[test]
    fn rows_are_independent() {
        let mut image = Image::new(3, 2, Color::BLACK);
        image.row_mut(1)[2] = Color::WHITE;

        assert_eq!(image.row(0), &[Color::BLACK; 3]);
        assert_eq!(image.pixel(2, 1), Color::WHITE);
        assert_eq!(image.pixels()[5], Color::WHITE);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn row_past_height_panics_for_zero_width() {
        let image = Image::new(0, 2, Color::BLACK);
        assert!(image.row(1).is_empty());
        image.row(2);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn row_mut_past_height_panics() {
        let mut image = Image::new(3, 2, Color::BLACK);
        image.row_mut(2);
    }

    #[test]
    fn default_image_is_empty() {
        let image = Image::default();
        assert!(image.is_empty());
        assert_eq!((image.width(), image.height()), (0, 0));

        // zero-height images have no pixels either, but still remember their width
        let flat = Image::new(7, 0, Color::WHITE);
        assert!(flat.is_empty());
        assert_eq!(flat.width(), 7);
    }
}
