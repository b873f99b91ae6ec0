pub struct MacroCall;

impl MacroCall {
    pub const OPEN: &'static str = "<<";
    pub const CLOSE: &'static str = ">>";
    pub const ARGS_OPEN: char = '(';
    pub const ARGS_CLOSE: char = ')';
    pub const TEXT: char = '|';
}
