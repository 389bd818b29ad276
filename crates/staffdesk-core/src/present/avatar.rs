// Avatar placeholders for records without a photo.

/// Background colors for placeholder avatars.
pub const AVATAR_PALETTE: [&str; 8] = [
    "#4F46E5", "#0EA5E9", "#10B981", "#F59E0B", "#EF4444", "#8B5CF6", "#EC4899", "#14B8A6",
];

/// Up to two uppercase initials: first letters of the first and last words.
pub fn initials(name: &str) -> String {
    let mut words = name.split_whitespace();
    let Some(first) = words.next() else {
        return "?".to_owned();
    };
    let last = words.next_back();

    [Some(first), last]
        .into_iter()
        .flatten()
        .filter_map(|w| w.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Stable palette color for `name`; the same name always gets the same color.
pub fn avatar_tone(name: &str) -> &'static str {
    let hash = name
        .trim()
        .bytes()
        .fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(u32::from(b)));
    let index = usize::try_from(hash).unwrap_or(0) % AVATAR_PALETTE.len();
    AVATAR_PALETTE[index]
}
