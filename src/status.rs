//! The two dynamic lines of the boot splash, describing the network connection.

use heapless::String;

/// Capacity of one status line in bytes.
pub const LINE_CAPACITY: usize = 48;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusLines {
    line1: String<LINE_CAPACITY>,
    line2: String<LINE_CAPACITY>,
}

impl StatusLines {
    /// Lines for a station that joined `ssid` and serves on `ip`:`port`. The SSID is shown in
    /// upper case, since the splash font is read in capitals; a name too long for the line is
    /// cut at a character boundary. `ip` is the four address octets, as `Ipv4Addr::octets`
    /// returns them.
    pub fn connected(ip: impl Into<[u8; 4]>, port: u16, ssid: &str) -> Self {
        let octets: [u8; 4] = ip.into();
        let mut line1 = String::new();
        push_truncated(&mut line1, "IP: ");
        for (i, octet) in octets.iter().enumerate() {
            if i > 0 {
                push_truncated(&mut line1, ".");
            }
            push_decimal(&mut line1, *octet as u16);
        }
        push_truncated(&mut line1, " PORT: ");
        push_decimal(&mut line1, port);

        let mut line2 = String::new();
        push_truncated(&mut line2, "WIFI: ");
        push_chars(&mut line2, ssid.chars().flat_map(char::to_uppercase));
        StatusLines { line1, line2 }
    }

    pub fn offline() -> Self {
        let mut lines = StatusLines {
            line1: String::new(),
            line2: String::new(),
        };
        push_truncated(&mut lines.line1, "NO WIFI CONNECTION");
        push_truncated(&mut lines.line2, "OFFLINE MODE");
        lines
    }

    pub fn line1(&self) -> &str {
        &self.line1
    }

    pub fn line2(&self) -> &str {
        &self.line2
    }

    /// Both lines, in the order `BootSplash::new` takes them.
    pub fn lines(&self) -> (&str, &str) {
        (self.line1.as_str(), self.line2.as_str())
    }
}

/// Append characters until the line is full.
fn push_chars(line: &mut String<LINE_CAPACITY>, chars: impl IntoIterator<Item = char>) {
    for ch in chars {
        if line.push(ch).is_err() {
            break;
        }
    }
}

fn push_truncated(line: &mut String<LINE_CAPACITY>, text: &str) {
    push_chars(line, text.chars())
}

fn push_decimal(line: &mut String<LINE_CAPACITY>, mut n: u16) {
    let mut digits = [0u8; 5];
    let mut len = 0;
    loop {
        digits[len] = b'0' + (n % 10) as u8;
        len += 1;
        n /= 10;
        if n == 0 {
            break;
        }
    }
    push_chars(line, digits[..len].iter().rev().map(|&d| d as char));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn connected_lines() {
        let ip = Ipv4Addr::new(192, 168, 1, 42);
        let status = StatusLines::connected(ip.octets(), 8080, "HomeNet-5G");
        assert_eq!(status.line1(), "IP: 192.168.1.42 PORT: 8080");
        assert_eq!(status.line2(), "WIFI: HOMENET-5G");
    }

    #[test]
    fn connected_accepts_octets() {
        let status = StatusLines::connected([255, 255, 255, 255], 65535, "x");
        assert_eq!(status.line1(), "IP: 255.255.255.255 PORT: 65535");
        assert_eq!(status.line2(), "WIFI: X");
    }

    #[test]
    fn zero_values_are_printed() {
        let status = StatusLines::connected([0, 0, 0, 0], 0, "");
        assert_eq!(status.line1(), "IP: 0.0.0.0 PORT: 0");
        assert_eq!(status.line2(), "WIFI: ");
    }

    #[test]
    fn offline_lines() {
        let status = StatusLines::offline();
        assert_eq!(status.lines(), ("NO WIFI CONNECTION", "OFFLINE MODE"));
    }

    #[test]
    fn long_ssid_is_cut_on_a_char_boundary() {
        // 'ß' upper-cases to "SS"; 'é' is two bytes.
        let ssid = "éééééééééééééééééééééééééééééé";
        let status = StatusLines::connected([10, 0, 0, 1], 80, ssid);
        let line = status.line2();
        assert!(line.starts_with("WIFI: ÉÉ"));
        assert!(line.len() <= LINE_CAPACITY);
        // 6 bytes of prefix plus 21 two-byte chars.
        assert_eq!(line.len(), 48);

        let status = StatusLines::connected([10, 0, 0, 1], 80, "straße");
        assert_eq!(status.line2(), "WIFI: STRASSE");
    }
}
