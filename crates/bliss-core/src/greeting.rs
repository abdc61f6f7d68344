/// Greeting for the hour of day (0-23), optionally addressed by name.
pub fn time_based_greeting(hour: u32, name: Option<&str>) -> String {
    let name = match name.map(str::trim) {
        Some(n) if !n.is_empty() => format!(", {n}"),
        _ => String::new(),
    };
    match hour {
        0..=5 => format!("🌙 Good night{name}, seeker of wisdom"),
        6..=11 => format!("🌅 Good morning{name}, beautiful soul"),
        12..=16 => format!("☀️ Good afternoon{name}, divine being"),
        17..=20 => format!("🌆 Good evening{name}, light worker"),
        _ => format!("✨ Good night{name}, cosmic traveler"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries() {
        assert!(time_based_greeting(5, None).contains("seeker of wisdom"));
        assert!(time_based_greeting(6, None).contains("Good morning"));
        assert!(time_based_greeting(12, None).contains("Good afternoon"));
        assert!(time_based_greeting(17, None).contains("Good evening"));
        assert!(time_based_greeting(21, None).contains("cosmic traveler"));
    }

    #[test]
    fn test_name() {
        assert_eq!(
            time_based_greeting(9, Some("Ana")),
            "🌅 Good morning, Ana, beautiful soul"
        );
        assert_eq!(
            time_based_greeting(9, Some("  ")),
            "🌅 Good morning, beautiful soul"
        );
    }
}
