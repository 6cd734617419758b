/// File extensions handled by the built-in extractors.
pub fn get_supported_extensions() -> Vec<&'static str> {
    crate::parsers::treesitter::languages::get_supported_extensions()
}
