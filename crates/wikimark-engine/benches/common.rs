// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_creole_content(size: usize) -> String {
    let base = "= Title =\n\n== Section ==\n\nParagraph with **bold**, //italic// and a [[Link|link]].\n\n* Bullet point\n** Nested item\n* Another item\n\n|=Name|=Value|\n|a|1|\n\n{{{\nfn example() {}\n}}}\n\n<<HelloWorld>>\n\n";
    base.repeat(size)
}

#[allow(dead_code)]
pub fn generate_markdown_content(size: usize) -> String {
    let base = "# Title\n\n## Section\n\nParagraph with **bold**, *italic* and a [link][1].\n\n- Bullet point\n  - Nested item\n- Another item\n\n> quoted\n\n```rust\nfn example() {}\n```\n\n[1]: http://example.com\n\n";
    base.repeat(size)
}
