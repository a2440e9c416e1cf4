use rust_decimal::Decimal;

/// Loop bound only.
pub const MAX_LEVEL: u32 = 20;

/// Volume level: floor(log2(volume)) clamped to `0..MAX_LEVEL`, with anything
/// under 2 scoring zero.
pub fn classify_volume(total_volume: Decimal) -> u32 {
    let two = Decimal::from(2);
    if total_volume < two {
        return 0;
    }

    let mut level = 1;
    let mut threshold = two;
    while total_volume >= threshold && level < MAX_LEVEL {
        level += 1;
        threshold *= two;
    }

    level - 1
}
