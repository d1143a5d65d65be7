use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

use crate::models::Annotation;

const BOX_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const BOX_THICKNESS: u32 = 2;

/// Copy of `image` with a green square around every annotated glyph.
///
/// Boxes may start outside the frame; they are clipped when drawn.
pub fn render_annotations(image: &DynamicImage, annotations: &[Annotation]) -> RgbImage {
    let mut canvas = image.to_rgb8();
    for annotation in annotations {
        for inset in 0..BOX_THICKNESS {
            let side = annotation.side.saturating_sub(2 * inset);
            if side == 0 {
                break;
            }
            let rect = Rect::at(annotation.x + inset as i32, annotation.y + inset as i32)
                .of_size(side, side);
            draw_hollow_rect_mut(&mut canvas, rect, BOX_COLOR);
        }
    }
    canvas
}
