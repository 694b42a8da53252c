// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// TEXT UTILITIES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Utilitários para processamento de texto de snippets:
// - Cleaning
// - Chaves de deduplicação
// - Sentenças
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Remove caracteres de controle e normaliza whitespace
pub fn clean_text(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Chave de identidade: apenas alfanuméricos, minúsculos
///
/// "Acme, Inc." e "ACME inc" geram a mesma chave.
pub fn normalize_key(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Normaliza uma frase curta (skill, tópico): trim, whitespace único, minúsculas
pub fn normalize_phrase(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Extrai primeira sentença de um texto
pub fn first_sentence(text: &str) -> &str {
    let terminators = ['.', '!', '?'];
    for (i, c) in text.char_indices() {
        if terminators.contains(&c) {
            // Verifica se não é abreviação (ex: "Dr.", "U.S.")
            let remaining = &text[i + c.len_utf8()..];
            if remaining.starts_with(char::is_whitespace) || remaining.is_empty() {
                return &text[..=i];
            }
        }
    }
    text
}

/// Conta palavras em um texto
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Remove pontuação das bordas de um fragmento capturado
pub fn trim_fragment(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | ':' | '-' | '.' | '|' | '"'))
}

/// Retorna `None` para strings vazias após trim
pub fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
