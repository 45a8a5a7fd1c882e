/// Generate the starter `.confxform.toml` written by `confxform --init`.
pub fn generate_init_template() -> String {
	r#"# confxform configuration
#
# Files are discovered from the package directory upward; a file with
# `root = true` stops the search (~/.confxform.toml is still read).
root = true

# Command that applies one transform file to one source file. It is run as:
#   <transformer> [transformer-args...] <source> <transform> <destination>
# transformer = "xdt-apply"
# transformer-args = []

[variables]
# Apply <name>.Release.<ext> and <name>.<Environment.Name>.<ext> when present
AutomaticallyRunConfigurationTransformationFiles = true
# "Environment.Name" = "Production"

# Explicit rules, one per line: "<transform pattern> => <source pattern>" or a bare suffix.
# AdditionalXmlConfigurationTransforms = """
# web.Foo.config => web.config
# *.Foo.config => *.Bar.config
# """
"#
	.to_string()
}
