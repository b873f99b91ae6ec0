use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::Chunk;

static NUMBERED_DEF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?m)^[ ]{0,3}\[(\d+)\]:[ \t]*\n?[ \t]*<?(\S+?)>?[ \t]*\n?[ \t]*(?:(\n*)["(](.+?)[")][ \t]*)?(?:\n+|$)"#,
    )
    .expect("invalid link definition regex")
});

static TRAILING_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"["(](.+?)[")]$"#).expect("invalid title regex"));

static DEF_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ ]{0,3}\[(\d+)\]:").expect("invalid definition id regex"));

static NUMBERED_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\[(?:\[[^\]]*\]|[^\[\]])*\][ ]?(?:\n[ ]*)?\[)(\d+)(\])")
        .expect("invalid link reference regex")
});

/// Removes numbered `[n]: url` definitions from `text`, recording each by
/// id. A title separated from its definition by blank lines stays in the
/// text.
fn strip_numbered_defs(text: &str, defs: &mut HashMap<String, String>) -> String {
    NUMBERED_DEF
        .replace_all(text, |caps: &Captures| {
            let whole = &caps[0];
            let newlines = caps.get(3).map_or("", |m| m.as_str());
            if newlines.is_empty() {
                defs.insert(caps[1].to_string(), whole.trim_end().to_string());
                return String::new();
            }
            defs.insert(
                caps[1].to_string(),
                TRAILING_TITLE.replace(whole, "").into_owned(),
            );
            format!("{newlines}{}", caps.get(4).map_or("", |m| m.as_str()))
        })
        .into_owned()
}

/// Assigns dense numbers to definitions in encounter order.
struct Renumbering<'d> {
    found: &'d HashMap<String, String>,
    count: usize,
    defs: String,
}

impl Renumbering<'_> {
    fn add(&mut self, def: &str) {
        self.count += 1;
        let renumbered = DEF_ID.replace(def, format!("  [{}]:", self.count).as_str());
        self.defs.push('\n');
        self.defs.push_str(&renumbered);
    }

    fn relink(&mut self, text: &str) -> String {
        NUMBERED_REF
            .replace_all(text, |caps: &Captures| match self.found.get(&caps[2]) {
                Some(def) => {
                    self.add(def);
                    format!("{}{}{}", &caps[1], self.count, &caps[3])
                }
                None => caps[0].to_string(),
            })
            .into_owned()
    }
}

/// Renumbers every numbered link reference in the chunk densely from 1 and
/// gathers the definitions at the end of `after`.
///
/// With `new_def` the definition is numbered right after those referenced
/// before the selection; its number is returned. Without one, references
/// inside the selection are renumbered instead.
pub fn add_link_def(chunk: &mut Chunk, new_def: Option<&str>) -> usize {
    let mut found = HashMap::new();
    chunk.before = strip_numbered_defs(&chunk.before, &mut found);
    chunk.selection = strip_numbered_defs(&chunk.selection, &mut found);
    chunk.after = strip_numbered_defs(&chunk.after, &mut found);

    let mut numbering = Renumbering {
        found: &found,
        count: 0,
        defs: String::new(),
    };
    chunk.before = numbering.relink(&chunk.before);
    match new_def {
        Some(def) => numbering.add(def),
        None => chunk.selection = numbering.relink(&chunk.selection),
    }
    let assigned = numbering.count;
    chunk.after = numbering.relink(&chunk.after);

    let after_len = chunk.after.trim_end_matches('\n').len();
    chunk.after.truncate(after_len);
    if chunk.after.is_empty() {
        let sel_len = chunk.selection.trim_end_matches('\n').len();
        chunk.selection.truncate(sel_len);
    }
    chunk.after.push_str("\n\n");
    chunk.after.push_str(&numbering.defs);
    assigned
}

/// Repairs common paste mistakes in a link target and adds a missing
/// scheme.
pub fn fix_url(url: &str) -> String {
    let url = url
        .replacen("http://http://", "http://", 1)
        .replacen("http://https://", "https://", 1)
        .replacen("http://ftp://", "ftp://", 1);
    if ["http://", "https://", "ftp://"]
        .iter()
        .any(|scheme| url.contains(scheme))
    {
        url
    } else {
        format!("http://{url}")
    }
}

/// Converts `\r\n` and lone `\r` line endings to `\n`.
pub fn fix_eol(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}
