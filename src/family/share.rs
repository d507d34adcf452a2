//! Invite-link sharing. Builds the channel URLs the share dialog offers;
//! actually opening them is outside the demo.

pub const INVITE_LINK: &str = "https://famstream.example/invite/family-abc123";

pub fn invite_message() -> String {
    format!(
        "Join our family streaming plan!\n\nSave up to 60% on movies and series.\n\n{INVITE_LINK}"
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareChannel {
    WhatsApp,
    Telegram,
    Email,
    Vk,
}

impl ShareChannel {
    pub const ALL: [ShareChannel; 4] = [
        ShareChannel::WhatsApp,
        ShareChannel::Telegram,
        ShareChannel::Email,
        ShareChannel::Vk,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ShareChannel::WhatsApp => "WhatsApp",
            ShareChannel::Telegram => "Telegram",
            ShareChannel::Email => "Email",
            ShareChannel::Vk => "VK",
        }
    }

    pub fn hint(&self) -> &'static str {
        match self {
            ShareChannel::WhatsApp => "Send a message",
            ShareChannel::Telegram => "Share in a chat",
            ShareChannel::Email => "Send a letter",
            ShareChannel::Vk => "Share a post",
        }
    }

    pub fn url(&self) -> String {
        match self {
            ShareChannel::WhatsApp => {
                format!("https://wa.me/?text={}", percent_encode(&invite_message()))
            }
            ShareChannel::Telegram => format!(
                "https://t.me/share/url?url={}&text={}",
                percent_encode(INVITE_LINK),
                percent_encode("Join our family streaming plan!")
            ),
            ShareChannel::Email => format!(
                "mailto:?subject={}&body={}",
                percent_encode("Family streaming plan invitation"),
                percent_encode(&invite_message())
            ),
            ShareChannel::Vk => {
                format!("https://vk.com/share.php?url={}", percent_encode(INVITE_LINK))
            }
        }
    }
}

/// Percent-encodes everything outside the URL-safe unreserved set.
fn percent_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_reserved_and_multibyte_characters() {
        assert_eq!(percent_encode("a b"), "a%20b");
        assert_eq!(percent_encode("a/b?c=d"), "a%2Fb%3Fc%3Dd");
        assert_eq!(percent_encode("жа"), "%D0%B6%D0%B0");
        assert_eq!(percent_encode("safe-._~"), "safe-._~");
    }

    #[test]
    fn channel_urls_carry_the_invite_link() {
        assert!(ShareChannel::WhatsApp.url().starts_with("https://wa.me/?text="));
        assert!(ShareChannel::Telegram
            .url()
            .contains(&percent_encode(INVITE_LINK)));
        assert!(ShareChannel::Email.url().starts_with("mailto:?subject="));
        assert!(ShareChannel::Vk.url().contains("share.php"));
        // no raw spaces or newlines survive encoding
        for channel in ShareChannel::ALL {
            let url = channel.url();
            assert!(!url.contains(' '), "unencoded space in {url}");
            assert!(!url.contains('\n'));
        }
    }
}
