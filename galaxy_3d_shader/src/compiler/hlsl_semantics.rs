/// Restore HLSL input/output semantics after SPIR-V round trips
///
/// SPIR-V has no semantics, so HLSL regenerated from it declares every varying
/// as `TEXCOORD<n>`. The authored semantic survives in the identifier suffix
/// (`in_var_NORMAL0`), which is copied back over the `TEXCOORD<n>` token.

const TEXCOORD_MARKER: &str = " : TEXCOORD";

/// Rewrite `ident_SEMANTIC : TEXCOORD<n>` into `ident_SEMANTIC : SEMANTIC`
///
/// Identifiers without an `_` are left untouched.
pub fn fix_spirv_cross_hlsl_semantics(content: &mut String) {
    let mut search_from = 0;

    while let Some(found) = content[search_from..].find(TEXCOORD_MARKER) {
        let marker = search_from + found;
        let token_start = marker + " : ".len();
        let token_end = content[token_start..]
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .map_or(content.len(), |offset| token_start + offset);

        let identifier_start = content[..marker]
            .char_indices()
            .rev()
            .take_while(|&(_, c)| c.is_alphanumeric() || c == '_')
            .last()
            .map_or(marker, |(offset, _)| offset);
        let identifier = &content[identifier_start..marker];

        match identifier.rfind('_') {
            Some(underscore) if underscore + 1 < identifier.len() => {
                let semantic = identifier[underscore + 1..].to_string();
                content.replace_range(token_start..token_end, &semantic);
                search_from = token_start + semantic.len();
            }
            _ => search_from = token_end,
        }
    }
}

#[cfg(test)]
#[path = "hlsl_semantics_tests.rs"]
mod tests;
