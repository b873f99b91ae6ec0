use pretty_assertions::assert_eq;
use rstest::rstest;
use wikimark_engine::editing::fix_eol;
use wikimark_engine::{Chunk, Command, EditState, EditorOptions, Flavor, apply};

const SAMPLES: &[&str] = &[
    "",
    "a",
    "hello **world**",
    "line one\nline two\n\n> quote",
    " - item\n - item two\n",
    "é ∑ ü",
    "[x][1]\n\n  [1]: http://x",
];

fn char_offsets(text: &str) -> Vec<usize> {
    text.char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect()
}

#[test]
fn chunk_reassembles_for_every_selection() {
    for text in SAMPLES {
        let offsets = char_offsets(text);
        for (i, &start) in offsets.iter().enumerate() {
            for &end in &offsets[i..] {
                let chunk = Chunk::new(text, start, end, 7).unwrap();
                assert_eq!(chunk.text(), *text);
                assert_eq!(
                    chunk.into_state(),
                    EditState {
                        text: text.to_string(),
                        selection: start..end,
                        scroll_top: 7,
                    }
                );
            }
        }
    }
}

/// Applies `cmd` to the state's selection and returns the new state.
fn step(state: &EditState, cmd: &Command, options: &EditorOptions) -> EditState {
    let mut chunk = Chunk::new(
        &state.text,
        state.selection.start,
        state.selection.end,
        state.scroll_top,
    )
    .unwrap();
    apply(cmd, &mut chunk, options);
    chunk.into_state()
}

fn state(text: &str, word: &str) -> EditState {
    let start = text.find(word).unwrap();
    EditState {
        text: text.to_string(),
        selection: start..start + word.len(),
        scroll_top: 0,
    }
}

#[rstest]
#[case::markdown_bold(Flavor::Markdown, Command::Bold)]
#[case::markdown_italic(Flavor::Markdown, Command::Italic)]
#[case::creole_bold(Flavor::Creole, Command::Bold)]
#[case::creole_italic(Flavor::Creole, Command::Italic)]
#[case::inline_code(Flavor::Markdown, Command::Code)]
fn toggling_twice_restores_the_text(#[case] flavor: Flavor, #[case] cmd: Command) {
    let options = EditorOptions::new(flavor);
    let original = state("some plain words here", "words");

    let once = step(&original, &cmd, &options);
    assert_ne!(once.text, original.text);
    assert_eq!(&once.text[once.selection.clone()], "words");

    let twice = step(&once, &cmd, &options);
    assert_eq!(twice, original);
}

#[test]
fn heading_cycle_returns_to_plain_text() {
    let options = EditorOptions::new(Flavor::Markdown);
    let mut current = state("Title", "Title");
    let mut seen = vec![];
    for _ in 0..3 {
        current = step(&current, &Command::Heading, &options);
        seen.push(current.text.clone());
    }
    assert_eq!(seen, vec!["Title\n-----", "Title\n=====", "Title"]);
}

#[test]
fn links_are_renumbered_when_one_is_added_in_between() {
    let options = EditorOptions::new(Flavor::Markdown);
    let text = "[first][1] middle [last][2]\n\n  [1]: http://one\n  [2]: http://two\n";
    let out = step(
        &state(text, "middle"),
        &Command::Link {
            url: Some("www.example.org".into()),
        },
        &options,
    );
    assert_eq!(
        out.text,
        "[first][1] [middle][2] [last][3]\n\n\n  [1]: http://one\n  [2]: http://www.example.org\n  [3]: http://two"
    );
    assert_eq!(&out.text[out.selection], "middle");
}

#[test]
fn scroll_position_is_carried_through() {
    let options = EditorOptions::new(Flavor::Creole);
    let mut before = state("x y", "y");
    before.scroll_top = 42;
    assert_eq!(step(&before, &Command::Bold, &options).scroll_top, 42);
}

#[test]
fn windows_line_endings_are_normalized_first() {
    let options = EditorOptions::new(Flavor::Markdown);
    let text = fix_eol("one\r\ntwo");
    let out = step(&state(&text, "two"), &Command::UnorderedList, &options);
    assert_eq!(out.text, "one\n\n - two");
}
