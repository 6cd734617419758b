pub const PACKAGE_QUERY: &str = "
    (package_declaration [(identifier) (scoped_identifier)] @package)
";

pub const TYPE_DECLARATION_QUERY: &str = "
    [(class_declaration) (interface_declaration) (enum_declaration) (record_declaration)] @node
";

pub const CALL_QUERY: &str = "(method_invocation) @call";

pub const FIELD_ACCESS_QUERY: &str = "(field_access) @access";

pub const LOCAL_VARIABLE_QUERY: &str = "(local_variable_declaration) @declaration";
