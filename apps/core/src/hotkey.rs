use std::collections::BTreeSet;

pub const DEFAULT_SEARCH_HOTKEY: &str = "Ctrl+K";

const MODIFIER_ORDER: [&str; 4] = ["Ctrl", "Alt", "Shift", "Meta"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hotkey {
    pub modifiers: Vec<String>,
    pub key: String,
}

impl Hotkey {
    /// Whether a key event forwarded by the shell fires this hotkey. The
    /// modifier set must match exactly; extra held modifiers do not count.
    pub fn matches(&self, modifiers: &[&str], key: &str) -> bool {
        let Ok(pressed_key) = normalize_key(key) else {
            return false;
        };
        if pressed_key != self.key {
            return false;
        }

        let mut pressed: BTreeSet<&'static str> = BTreeSet::new();
        for modifier in modifiers {
            match normalize_modifier(modifier) {
                Ok(normalized) => {
                    pressed.insert(normalized);
                }
                Err(_) => return false,
            }
        }

        pressed.len() == self.modifiers.len()
            && self
                .modifiers
                .iter()
                .all(|modifier| pressed.contains(modifier.as_str()))
    }
}

pub fn parse_hotkey(input: &str) -> Result<Hotkey, String> {
    let canonical = validate_hotkey(input)?;
    let mut parts: Vec<String> = canonical.split('+').map(str::to_string).collect();
    let key = parts.pop().unwrap_or_default();
    Ok(Hotkey {
        modifiers: parts,
        key,
    })
}

pub fn validate_hotkey(input: &str) -> Result<String, String> {
    let raw_parts: Vec<&str> = input
        .split('+')
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect();

    if raw_parts.len() < 2 {
        return Err("Hotkey must include at least one modifier and one key.".to_string());
    }

    let key = normalize_key(raw_parts[raw_parts.len() - 1])?;

    let mut modifiers: BTreeSet<&'static str> = BTreeSet::new();
    for part in &raw_parts[..raw_parts.len() - 1] {
        modifiers.insert(normalize_modifier(part)?);
    }

    let canonical = canonical_hotkey(&modifiers, &key);
    if is_reserved_hotkey(&canonical) {
        return Err("This hotkey is reserved by browsers. Choose a different one.".to_string());
    }

    Ok(canonical)
}

fn normalize_modifier(input: &str) -> Result<&'static str, String> {
    match input.trim().to_ascii_lowercase().as_str() {
        "ctrl" | "control" => Ok("Ctrl"),
        "alt" | "option" => Ok("Alt"),
        "shift" => Ok("Shift"),
        "meta" | "cmd" | "command" | "super" | "win" => Ok("Meta"),
        _ => Err(format!(
            "Unsupported modifier '{input}'. Use Ctrl, Alt, Shift, or Meta."
        )),
    }
}

fn normalize_key(input: &str) -> Result<String, String> {
    if input == " " {
        return Ok("Space".to_string());
    }
    let raw = input.trim();
    if raw.is_empty() {
        return Err("Hotkey key is required.".to_string());
    }

    let upper = raw.to_ascii_uppercase();
    match upper.as_str() {
        "SPACE" => return Ok("Space".to_string()),
        "SLASH" | "/" => return Ok("Slash".to_string()),
        _ => {}
    }

    if upper.len() > 1 {
        if let Some(number) = upper.strip_prefix('F') {
            if let Ok(parsed) = number.parse::<u8>() {
                if (1..=24).contains(&parsed) {
                    return Ok(format!("F{parsed}"));
                }
            }
            return Err("Function key must be between F1 and F24.".to_string());
        }
    }

    let mut chars = upper.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_ascii_alphanumeric() {
            return Ok(upper);
        }
    }

    Err("Key must be A-Z, 0-9, Space, Slash, or F1-F24.".to_string())
}

fn canonical_hotkey(modifiers: &BTreeSet<&'static str>, key: &str) -> String {
    let mut ordered: Vec<&str> = MODIFIER_ORDER
        .iter()
        .copied()
        .filter(|modifier| modifiers.contains(modifier))
        .collect();
    ordered.push(key);
    ordered.join("+")
}

fn is_reserved_hotkey(canonical: &str) -> bool {
    matches!(
        canonical,
        "Ctrl+W"
            | "Ctrl+T"
            | "Ctrl+N"
            | "Ctrl+Q"
            | "Meta+W"
            | "Meta+T"
            | "Meta+N"
            | "Meta+Q"
    )
}
