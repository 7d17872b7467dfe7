//! Dissection of C++ type names as they appear in streamer metadata.
//!
//! These are deliberately naive string operations: metadata writers emit
//! normalized names, so a full C++ type grammar is not needed. Template
//! arguments are split at the first comma not nested inside angle brackets.

/// Drop leading namespace qualifiers (`std::vector<int>` -> `vector<int>`).
///
/// Only the head of the name is stripped; namespaces inside template
/// arguments are handled when those arguments are themselves dissected.
pub fn strip_namespaces(name: &str) -> &str {
    let head_end = name.find('<').unwrap_or(name.len());
    match name[..head_end].rfind("::") {
        Some(pos) => &name[pos + 2..],
        None => name,
    }
}

/// Split `head<args>` into `(head, args)`, or `None` for non-templates.
///
/// The trailing `>` must close the first `<`; anything else is treated as a
/// plain (non-template) name.
pub fn template_of(name: &str) -> Option<(&str, &str)> {
    let name = name.trim();
    let open = name.find('<')?;
    if !name.ends_with('>') {
        return None;
    }
    Some((&name[..open], name[open + 1..name.len() - 1].trim()))
}

/// Split template argument text at the first top-level comma.
///
/// `"int, vector<float>"` -> `("int", "vector<float>")`;
/// `"pair<int,int>, bool"` splits after the pair, not inside it.
pub fn split_top_level_comma(args: &str) -> Option<(&str, &str)> {
    let mut depth = 0usize;
    for (i, c) in args.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                return Some((args[..i].trim(), args[i + 1..].trim()));
            }
            _ => {}
        }
    }
    None
}

/// Collapse whitespace runs around template brackets
/// (`vector< int >` -> `vector<int>`).
pub fn normalize_spaces(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_space = false;
    for c in name.chars() {
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space {
            let boundary = matches!(c, '<' | '>' | ',' | '*' | '&')
                || matches!(out.chars().last(), Some('<' | '>' | ',') | None);
            if !boundary {
                out.push(' ');
            }
            pending_space = false;
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_std_namespace() {
        assert_eq!(strip_namespaces("std::vector<int>"), "vector<int>");
        assert_eq!(strip_namespaces("ns::deep::Thing"), "Thing");
        assert_eq!(strip_namespaces("vector<std::string>"), "vector<std::string>");
        assert_eq!(strip_namespaces("double"), "double");
    }

    #[test]
    fn template_head_and_args() {
        assert_eq!(template_of("vector<int>"), Some(("vector", "int")));
        assert_eq!(
            template_of("map<string, vector<int>>"),
            Some(("map", "string, vector<int>"))
        );
        assert_eq!(template_of("double"), None);
        assert_eq!(template_of("vector<int> "), None); // malformed tail
    }

    #[test]
    fn comma_split_respects_nesting() {
        assert_eq!(
            split_top_level_comma("int, vector<float>"),
            Some(("int", "vector<float>"))
        );
        assert_eq!(
            split_top_level_comma("pair<int,int>, bool"),
            Some(("pair<int,int>", "bool"))
        );
        assert_eq!(split_top_level_comma("vector<pair<int,int>>"), None);
    }

    #[test]
    fn space_normalization() {
        assert_eq!(normalize_spaces("vector< int >"), "vector<int>");
        assert_eq!(
            normalize_spaces("map< string , vector< int > >"),
            "map<string,vector<int>>"
        );
        assert_eq!(normalize_spaces("unsigned  long long"), "unsigned long long");
    }
}
