pub struct WikiImage;

impl WikiImage {
    pub const OPEN: &'static str = "{{";
    pub const CLOSE: &'static str = "}}";
    pub const ALIAS: char = '|';
}
