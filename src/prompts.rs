pub const AGING_PROMPT: &str = include_str!("../data/prompts/aging.txt");
pub const LETTER_SYSTEM: &str = include_str!("../data/prompts/letter_system.txt");
pub const LETTER_USER: &str = include_str!("../data/prompts/letter_user.txt");

/// Replace `{{key}}` placeholders in a template string.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{{{}}}}}", key), value);
    }
    result
}
