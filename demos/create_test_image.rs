use image::{Luma, GrayImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

// Blocky "2", "0", "4" in dark ink on light paper, with some paper texture
fn main() -> anyhow::Result<()> {
    let mut img = GrayImage::from_fn(320, 120, |x, y| Luma([235 + ((x * 7 + y * 13) % 15) as u8]));
    let ink = Luma([25u8]);

    // 2
    draw_filled_rect_mut(&mut img, Rect::at(30, 25).of_size(40, 8), ink);
    draw_filled_rect_mut(&mut img, Rect::at(62, 25).of_size(8, 35), ink);
    draw_filled_rect_mut(&mut img, Rect::at(30, 55).of_size(40, 8), ink);
    draw_filled_rect_mut(&mut img, Rect::at(30, 55).of_size(8, 40), ink);
    draw_filled_rect_mut(&mut img, Rect::at(30, 88).of_size(40, 8), ink);

    // 0
    draw_filled_rect_mut(&mut img, Rect::at(130, 25).of_size(40, 71), ink);
    draw_filled_rect_mut(&mut img, Rect::at(138, 33).of_size(24, 55), Luma([240u8]));

    // 4
    draw_filled_rect_mut(&mut img, Rect::at(230, 25).of_size(8, 40), ink);
    draw_filled_rect_mut(&mut img, Rect::at(230, 58).of_size(45, 8), ink);
    draw_filled_rect_mut(&mut img, Rect::at(262, 25).of_size(8, 71), ink);

    img.save("digits_test.png")?;
    println!("Created digits_test.png (320x120, digits 2 0 4)");
    Ok(())
}
