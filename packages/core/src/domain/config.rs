//! Chat session configuration.

/// Credentials and room for the chat session.
///
/// Parsed from `key=value` lines. A config with any empty field disables the chat
/// session but not the rest of the wheel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionConfig {
    /// Chat credential, sent verbatim after `PASS` (usually `oauth:...`)
    pub auth_token: String,
    /// Identity of the host account, sent after `NICK`
    pub nickname: String,
    /// Room to join, sent after `JOIN` (usually `#channel`)
    pub room: String,
}

impl SessionConfig {
    pub fn new(
        auth_token: impl Into<String>,
        nickname: impl Into<String>,
        room: impl Into<String>,
    ) -> Self {
        Self {
            auth_token: auth_token.into(),
            nickname: nickname.into(),
            room: room.into(),
        }
    }

    /// Parse `key=value` lines.
    ///
    /// Blank lines and lines starting with `#` are skipped, as are lines without `=`.
    /// Keys (`oauth`, `nick`, `channel`) are case-insensitive; keys and values are
    /// whitespace-trimmed. A repeated key overrides the earlier value.
    ///
    /// # Examples
    ///
    /// ```
    /// use spinwheel_core::domain::SessionConfig;
    ///
    /// let config = SessionConfig::parse("oauth = oauth:abc\nNICK=host\n# comment\nchannel=#host\n");
    /// assert_eq!(config, SessionConfig::new("oauth:abc", "host", "#host"));
    /// assert!(config.is_complete());
    /// ```
    pub fn parse(contents: &str) -> Self {
        let mut config = Self::default();

        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = value.trim().to_string();

            match key.trim().to_lowercase().as_str() {
                "oauth" => config.auth_token = value,
                "nick" => config.nickname = value,
                "channel" => config.room = value,
                _ => {}
            }
        }

        config
    }

    /// `true` when every field needed to log in is present.
    pub fn is_complete(&self) -> bool {
        !self.auth_token.is_empty() && !self.nickname.is_empty() && !self.room.is_empty()
    }

    /// The host participant reseeded into every round, if a nick is configured.
    pub fn host_nickname(&self) -> Option<&str> {
        (!self.nickname.is_empty()).then_some(self.nickname.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_comments_and_malformed_lines() {
        // テスト項目: コメント行・空行・'=' の無い行は読み飛ばされる
        // given (前提条件):
        let contents = "# chat login\n\n  nick = host_nick  \nnot a setting\nchannel=#room\n";

        // when (操作):
        let config = SessionConfig::parse(contents);

        // then (期待する結果):
        assert_eq!(config.auth_token, "");
        assert_eq!(config.nickname, "host_nick");
        assert_eq!(config.room, "#room");
        assert!(!config.is_complete());
    }

    #[test]
    fn test_parse_keeps_equals_sign_in_value() {
        // テスト項目: 値の中の '=' は値の一部として扱われる
        // given (前提条件):
        let contents = "oauth=oauth:abc=def";

        // when (操作):
        let config = SessionConfig::parse(contents);

        // then (期待する結果):
        assert_eq!(config.auth_token, "oauth:abc=def");
    }

    #[test]
    fn test_parse_later_key_overrides_earlier() {
        // テスト項目: 同じキーが複数ある場合は後の値が使われる
        // given (前提条件):
        let contents = "nick=first\nNick=second";

        // when (操作):
        let config = SessionConfig::parse(contents);

        // then (期待する結果):
        assert_eq!(config.nickname, "second");
    }

    #[test]
    fn test_host_nickname_requires_nick() {
        // テスト項目: ニックネームが未設定の場合はホスト参加者が存在しない
        // given (前提条件):
        let empty = SessionConfig::default();
        let configured = SessionConfig::new("", "host", "");

        // when (操作):
        let empty_host = empty.host_nickname();
        let configured_host = configured.host_nickname();

        // then (期待する結果):
        assert_eq!(empty_host, None);
        assert_eq!(configured_host, Some("host"));
        assert!(!configured.is_complete());
    }
}
