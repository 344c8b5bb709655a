//! Display names like "Indigo Kit Kat"

use crate::random::SeededRng;

const COLORS: [&str; 9] = [
    "Red", "Orange", "Yellow", "Green", "Blue", "Indigo", "Violet", "Purple", "Lavender",
];

const TREATS: [&str; 14] = [
    "Cupcake",
    "Donut",
    "Eclair",
    "Froyo",
    "Gingerbread",
    "Honeycomb",
    "Ice Cream Sandwich",
    "Jellybean",
    "Kit Kat",
    "Lollipop",
    "Marshmallow",
    "Nougat",
    "Oreo",
    "Pie",
];

/// `"<Color> <Treat>"`
pub fn generate_codename(rng: &mut SeededRng) -> String {
    let color = COLORS[rng.next_below(COLORS.len())];
    let treat = TREATS[rng.next_below(TREATS.len())];
    format!("{color} {treat}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codename_shape() {
        let mut rng = SeededRng::from_u64(1);
        for _ in 0..50 {
            let name = generate_codename(&mut rng);
            let (color, treat) = name.split_once(' ').unwrap();
            assert!(COLORS.contains(&color), "unknown color in {name:?}");
            assert!(TREATS.contains(&treat), "unknown treat in {name:?}");
        }
    }

    #[test]
    fn test_codename_is_reproducible() {
        let a = generate_codename(&mut SeededRng::new(&[9u8; 32]));
        let b = generate_codename(&mut SeededRng::new(&[9u8; 32]));
        assert_eq!(a, b);
    }
}
