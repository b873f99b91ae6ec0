use std::sync::LazyLock;

use regex::Regex;

/// `[id]: url "optional title"`, up to three spaces in.
static DEFINITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^[ ]{0,3}\[([^\]]+)\]:[ \t]*<?(\S+?)>?(?:[ \t]+["'(](.+?)["')])?[ \t]*$"#)
        .expect("invalid link definition regex")
});

/// A title alone on the line after a definition.
static TITLE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^[ \t]+["'(](.+?)["')][ \t]*$"#).expect("invalid link title regex")
});

/// A Markdown link reference definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkDefinition {
    pub id: String,
    pub url: String,
    pub title: Option<String>,
}

impl LinkDefinition {
    pub fn parse(line: &str) -> Option<Self> {
        let caps = DEFINITION.captures(line)?;
        Some(Self {
            id: caps[1].to_string(),
            url: caps[2].to_string(),
            title: caps.get(3).map(|m| m.as_str().to_string()),
        })
    }

    /// Reads a title continued on the next line.
    pub fn title_line(line: &str) -> Option<String> {
        TITLE_LINE.captures(line).map(|caps| caps[1].to_string())
    }
}
