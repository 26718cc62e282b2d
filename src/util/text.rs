use std::borrow::Cow;

/// Ellipsis appended to truncated text
const ELLIPSIS: &str = "...";

/// Truncates text to at most `max_length` characters, appending `"..."` when cut.
///
/// Lengths count Unicode scalar values, never bytes, so multi-byte text is
/// never split inside a character. The cut is not word-aware: it may land in
/// the middle of a word, and display layers rely on that exact output.
///
/// # Arguments
///
/// * `text` - The text to bound
/// * `max_length` - Maximum number of characters kept. `None` or `Some(0)`
///   disables truncation.
///
/// # Returns
///
/// - `Cow::Borrowed(text)` when no bound applies or the text already fits
/// - `Cow::Owned` with the first `max_length` characters plus `"..."` otherwise
///   (so the result is `max_length + 3` characters long)
///
/// # Examples
///
/// ```
/// use rss_items::util::truncate;
///
/// assert_eq!(truncate("Short", Some(10)), "Short");
/// assert_eq!(truncate("Hello World", Some(5)), "Hello...");
/// assert_eq!(truncate("Hello World", None), "Hello World");
/// assert_eq!(truncate("Hello World", Some(0)), "Hello World");
/// ```
pub fn truncate(text: &str, max_length: Option<usize>) -> Cow<'_, str> {
    let Some(max) = max_length.filter(|&m| m > 0) else {
        return Cow::Borrowed(text);
    };

    // The (max + 1)-th character exists only when the text is too long
    match text.char_indices().nth(max) {
        Some((cut, _)) => Cow::Owned(format!("{}{}", &text[..cut], ELLIPSIS)),
        None => Cow::Borrowed(text),
    }
}

/// SEC-001: Strip terminal control characters and ANSI escape sequences.
///
/// Feed titles and excerpts are attacker-controlled; printing them raw to a
/// terminal lets a feed move the cursor or rewrite the window title.
///
/// Removes C0 controls (except tab, newline, carriage return), DEL, CSI
/// sequences (`ESC [` ... final byte), OSC sequences (`ESC ]` ... BEL or
/// `ESC \`), and any other bare ESC.
///
/// Returns `Cow::Borrowed` when nothing needs stripping.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    if !s.chars().any(is_stripped_control) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\x1b' {
            if !is_stripped_control(c) {
                out.push(c);
            }
            continue;
        }

        match chars.peek() {
            Some('[') => {
                chars.next();
                // Parameter and intermediate bytes run until a final byte in 0x40..=0x7E
                for c in chars.by_ref() {
                    if ('\x40'..='\x7e').contains(&c) {
                        break;
                    }
                }
            }
            Some(']') => {
                chars.next();
                while let Some(c) = chars.next() {
                    if c == '\x07' {
                        break;
                    }
                    if c == '\x1b' && chars.peek() == Some(&'\\') {
                        chars.next();
                        break;
                    }
                }
            }
            _ => {}
        }
    }

    Cow::Owned(out)
}

fn is_stripped_control(c: char) -> bool {
    c == '\x7f' || (c < '\x20' && !matches!(c, '\t' | '\n' | '\r'))
}
