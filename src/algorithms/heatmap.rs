/// 热力图颜色映射
///
/// 将归一化强度 [0, 1] 映射为 RGBA：低强度偏红、高强度偏绿，透明度随强度增加。

use serde::Serialize;

use crate::algorithms::ScalarGrid;

/// 似然热力图的最大不透明度
pub const LIKELIHOOD_ALPHA: u8 = 150;

/// 覆盖热力图的最大不透明度
pub const COVERAGE_ALPHA: u8 = 100;

/// RGBA 颜色
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// 强度映射为颜色，强度会被限制在 [0, 1]，NaN 视为 0
pub fn intensity_color(intensity: f64, max_alpha: u8) -> Rgba {
    let i = if intensity.is_nan() {
        0.0
    } else {
        intensity.clamp(0.0, 1.0)
    };
    Rgba {
        r: (255.0 * (1.0 - i)) as u8,
        g: (255.0 * i) as u8,
        b: (128.0 * (1.0 - i)) as u8,
        a: (f64::from(max_alpha) * i) as u8,
    }
}

/// 将归一化网格整体映射为颜色（行优先）
pub fn colorize(intensities: &ScalarGrid, max_alpha: u8) -> Vec<Rgba> {
    intensities
        .values()
        .iter()
        .map(|&i| intensity_color(i, max_alpha))
        .collect()
}

/// 字符画渲染使用的灰度字符，由弱到强
const SHADES: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// 将归一化网格渲染为字符画，每行一个字符串
pub fn render_ascii(intensities: &ScalarGrid) -> Vec<String> {
    let top = (SHADES.len() - 1) as f64;
    intensities
        .rows()
        .map(|row| {
            row.iter()
                .map(|&i| {
                    let i = if i.is_nan() { 0.0 } else { i.clamp(0.0, 1.0) };
                    SHADES[(i * top).round() as usize]
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intensity_color_endpoints() {
        assert_eq!(
            intensity_color(0.0, LIKELIHOOD_ALPHA),
            Rgba { r: 255, g: 0, b: 128, a: 0 }
        );
        assert_eq!(
            intensity_color(1.0, LIKELIHOOD_ALPHA),
            Rgba { r: 0, g: 255, b: 0, a: 150 }
        );
        assert_eq!(intensity_color(1.0, COVERAGE_ALPHA).a, 100);
    }

    #[test]
    fn test_intensity_color_clamps() {
        assert_eq!(intensity_color(2.0, 150), intensity_color(1.0, 150));
        assert_eq!(intensity_color(-1.0, 150), intensity_color(0.0, 150));
        assert_eq!(intensity_color(f64::NAN, 150), intensity_color(0.0, 150));
    }

    #[test]
    fn test_render_ascii() {
        let grid = ScalarGrid::from_row_major(3, 2, vec![0.0, 0.5, 1.0, 1.0, 0.0, 0.0]).unwrap();
        let lines = render_ascii(&grid);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].chars().count(), 3);
        assert!(lines[0].ends_with('@'));
        assert!(lines[1].starts_with('@'));
    }
}
