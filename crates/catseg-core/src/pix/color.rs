//! RGBA pixel packing
//!
//! 32-bpp pixels are exchanged as a single `u32` with red in the most
//! significant byte: `0xRRGGBBAA`.

/// Compose an opaque RGB pixel.
#[inline]
pub fn compose_rgb(r: u8, g: u8, b: u8) -> u32 {
    compose_rgba(r, g, b, 255)
}

/// Compose an RGBA pixel.
#[inline]
pub fn compose_rgba(r: u8, g: u8, b: u8, a: u8) -> u32 {
    ((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | (a as u32)
}

/// Extract the RGB components of a pixel.
#[inline]
pub fn extract_rgb(pixel: u32) -> (u8, u8, u8) {
    ((pixel >> 24) as u8, (pixel >> 16) as u8, (pixel >> 8) as u8)
}

/// Extract the RGBA components of a pixel.
#[inline]
pub fn extract_rgba(pixel: u32) -> (u8, u8, u8, u8) {
    (
        (pixel >> 24) as u8,
        (pixel >> 16) as u8,
        (pixel >> 8) as u8,
        pixel as u8,
    )
}

/// Storage byte order of a composed pixel.
#[inline]
pub(crate) fn to_bytes(pixel: u32) -> [u8; 4] {
    pixel.to_be_bytes()
}

/// Compose a pixel from its storage bytes.
#[inline]
pub(crate) fn from_bytes(bytes: &[u8]) -> u32 {
    u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// Luminance of an RGB triple (ITU-R BT.601 weights).
#[inline]
pub fn luminance(r: u8, g: u8, b: u8) -> u8 {
    let l = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
    l.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_extract() {
        let p = compose_rgba(10, 20, 30, 40);
        assert_eq!(extract_rgba(p), (10, 20, 30, 40));
        assert_eq!(extract_rgb(compose_rgb(1, 2, 3)), (1, 2, 3));
        assert_eq!(from_bytes(&to_bytes(p)), p);
    }

    #[test]
    fn test_luminance_extremes() {
        assert_eq!(luminance(0, 0, 0), 0);
        assert_eq!(luminance(255, 255, 255), 255);
    }
}
