// src/db/sequence_repo.rs
//
// Numeração de documentos (F = remessa, S = retorno, P = pagamento) por
// organização. Um contador serializado por (org, prefixo): o INSERT ... ON
// DUPLICATE KEY UPDATE trava a linha do contador até o commit da transação
// chamadora, então duas criações concorrentes nunca recebem o mesmo número.

use sqlx::{MySqlConnection, Row};

use crate::common::error::AppError;

// Aloca o próximo número dentro da transação do chamador.
pub async fn next_doc_no(
    conn: &mut MySqlConnection,
    org_id: i64,
    prefix: char,
) -> Result<String, AppError> {
    let prefix_str = prefix.to_string();

    // Cria o contador em 2 (primeiro número alocado = 1) ou incrementa o
    // existente. A linha fica travada até o fim da transação.
    sqlx::query(
        "INSERT INTO doc_sequences (org_id, prefix, next_value) VALUES (?, ?, 2) \
         ON DUPLICATE KEY UPDATE next_value = next_value + 1",
    )
    .bind(org_id)
    .bind(&prefix_str)
    .execute(&mut *conn)
    .await?;

    let row = sqlx::query(
        "SELECT next_value - 1 AS allocated FROM doc_sequences WHERE org_id = ? AND prefix = ?",
    )
    .bind(org_id)
    .bind(&prefix_str)
    .fetch_one(&mut *conn)
    .await?;

    let allocated: i64 = row.try_get("allocated")?;
    Ok(format_doc_no(prefix, allocated))
}

// F0001, S0012, P0107... O zero à esquerda é largura mínima: o contador
// passa de 9999 sem quebrar (F10000).
pub fn format_doc_no(prefix: char, seq: i64) -> String {
    format!("{prefix}{seq:04}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeracao_com_zero_a_esquerda() {
        assert_eq!(format_doc_no('F', 1), "F0001");
        assert_eq!(format_doc_no('S', 47), "S0047");
        assert_eq!(format_doc_no('P', 9999), "P9999");
    }

    #[test]
    fn numeracao_nao_trunca_acima_de_quatro_digitos() {
        assert_eq!(format_doc_no('F', 10_000), "F10000");
    }
}
