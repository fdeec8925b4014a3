//! Placeholder substitution engine for notification templates

/// Replace `{name}` placeholders in a single left-to-right pass.
///
/// Only names present in `variables` are replaced; unknown tokens and stray
/// braces are copied through. Substituted values are never rescanned, so a
/// value that itself contains `{title}` stays literal.
pub fn substitute_placeholders(template: &str, variables: &[(&str, &str)]) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        result.push_str(&rest[..open]);
        let candidate = &rest[open..];

        let replaced = candidate[1..].find('}').and_then(|close| {
            let name = &candidate[1..=close];
            variables
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close + 2))
        });

        match replaced {
            Some((value, consumed)) => {
                result.push_str(value);
                rest = &candidate[consumed..];
            }
            None => {
                result.push('{');
                rest = &candidate[1..];
            }
        }
    }

    result.push_str(rest);
    result
}
