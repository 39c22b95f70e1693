//! LiveReload protocol messages
//!
//! Only the subset browsers need: the `hello` handshake and `reload`.

use serde::{Deserialize, Serialize};

/// Protocol identifier we speak
pub const PROTOCOL_V7: &str = "http://livereload.com/protocols/official-7";

/// Name announced in the server hello
pub const SERVER_NAME: &str = "stylesync";

/// Messages sent to browsers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum ServerMessage {
    Hello {
        protocols: Vec<String>,
        #[serde(rename = "serverName")]
        server_name: String,
    },
    Reload {
        path: String,
        #[serde(rename = "liveCSS")]
        live_css: bool,
        #[serde(rename = "liveImg")]
        live_img: bool,
    },
}

impl ServerMessage {
    pub fn hello() -> Self {
        ServerMessage::Hello {
            protocols: vec![PROTOCOL_V7.to_string()],
            server_name: SERVER_NAME.to_string(),
        }
    }

    /// Reload for a changed path; stylesheets are swapped in place
    pub fn reload(path: impl Into<String>) -> Self {
        ServerMessage::Reload {
            path: path.into(),
            live_css: true,
            live_img: true,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Messages browsers send us
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum ClientMessage {
    Hello {
        #[serde(default)]
        protocols: Vec<String>,
    },
    Info {
        #[serde(default)]
        url: Option<String>,
    },
    #[serde(other)]
    Other,
}

impl ClientMessage {
    pub fn parse(text: &str) -> Option<Self> {
        serde_json::from_str(text).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_hello_json() {
        let json = ServerMessage::hello().to_json();
        assert_eq!(
            json,
            r#"{"command":"hello","protocols":["http://livereload.com/protocols/official-7"],"serverName":"stylesync"}"#
        );
    }

    #[test]
    fn reload_json() {
        let json = ServerMessage::reload("css/site-sass-out.css.twig").to_json();
        assert_eq!(
            json,
            r#"{"command":"reload","path":"css/site-sass-out.css.twig","liveCSS":true,"liveImg":true}"#
        );
    }

    #[test]
    fn parse_client_hello() {
        let msg = ClientMessage::parse(
            r#"{"command":"hello","protocols":["http://livereload.com/protocols/official-7"]}"#,
        );
        assert!(matches!(msg, Some(ClientMessage::Hello { ref protocols }) if protocols.len() == 1));
    }

    #[test]
    fn parse_client_info() {
        let msg = ClientMessage::parse(r#"{"command":"info","url":"http://site.test/"}"#);
        assert_eq!(
            msg,
            Some(ClientMessage::Info {
                url: Some("http://site.test/".to_string())
            })
        );
    }

    #[test]
    fn parse_unknown_command() {
        assert_eq!(
            ClientMessage::parse(r#"{"command":"url"}"#),
            Some(ClientMessage::Other)
        );
        assert_eq!(ClientMessage::parse("not json"), None);
    }
}
