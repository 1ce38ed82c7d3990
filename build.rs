use std::fs;

fn main() {
    // Validate default config at compile time
    let config_path = "src/default_config.toml";
    println!("cargo:rerun-if-changed={}", config_path);

    let content = fs::read_to_string(config_path).expect("Failed to read default_config.toml");

    let table = match content.parse::<toml::Table>() {
        Ok(table) => table,
        Err(e) => panic!("Invalid default_config.toml: {}", e),
    };

    // Every preset must be a table with the fields the template needs
    let Some(themes) = table.get("themes").and_then(|t| t.as_table()) else {
        panic!("default_config.toml has no [themes] table");
    };
    for (name, theme) in themes {
        for field in ["title", "accent", "header_color"] {
            if theme.get(field).and_then(|v| v.as_str()).is_none() {
                panic!("default_config.toml: themes.{name} is missing `{field}`");
            }
        }
    }
}
