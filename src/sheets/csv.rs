/// Split published-sheet CSV text into rows of trimmed fields.
///
/// The dialect is deliberately small: every `"` toggles quoted mode and is
/// dropped, a `,` outside quotes ends a field, and there are no escaped quotes.
/// Lines that are blank after trimming are skipped, so a quoted field spanning
/// a blank line cannot be represented.
pub fn tokenize(text: &str) -> Vec<Vec<String>> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.trim().is_empty())
        .map(split_line)
        .collect()
}

fn split_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    fields.push(current.trim().to_string());

    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_has_no_rows() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("\n\r\n   \n").is_empty());
    }

    #[test]
    fn plain_lines_rejoin_to_trimmed_fields() {
        let text = "Título , Preço,Bairro\r\n Casa azul,  R$ 100 mil ,Centro\n";
        let rows = tokenize(text);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].join(","), "Título,Preço,Bairro");
        assert_eq!(rows[1].join(","), "Casa azul,R$ 100 mil,Centro");
    }

    #[test]
    fn quoted_comma_stays_in_field() {
        let rows = tokenize("\"Rio, Centro\",100");
        assert_eq!(rows, vec![vec!["Rio, Centro".to_string(), "100".to_string()]]);
    }

    #[test]
    fn blank_lines_are_dropped() {
        let rows = tokenize("a,b\n\n   \nc,d\r\n\r\n");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], vec!["c", "d"]);
    }

    #[test]
    fn trailing_comma_yields_empty_last_field() {
        let rows = tokenize("a,b,");
        assert_eq!(rows[0], vec!["a", "b", ""]);
    }

    #[test]
    fn unterminated_quote_swallows_rest_of_line() {
        let rows = tokenize("\"a,b,c");
        assert_eq!(rows[0], vec!["a,b,c"]);
    }
}
