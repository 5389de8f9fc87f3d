// src/common/db_utils.rs

use chrono::NaiveDate;
use serde::Deserialize;

use crate::common::error::AppError;

// Paginação vinda da query string. Os valores NUNCA são interpolados como
// string no SQL: viram i64 aqui e entram como bind de LIMIT/OFFSET.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

const DEFAULT_PAGE_SIZE: u32 = 20;
const MAX_PAGE_SIZE: u32 = 200;

impl Pagination {
    // (limit, offset) saneados para bind direto.
    pub fn limit_offset(&self) -> (i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let size = self
            .page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        (i64::from(size), i64::from(size) * i64::from(page - 1))
    }
}

// Intervalo de datas fechado [start, end] usado pelo extrato.
// Datas chegam como "YYYY-MM-DD"; qualquer outro formato é 400.
#[derive(Debug, Clone, Copy)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, AppError> {
        let parse_one = |value: &str| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| AppError::InvalidDateRange)
        };

        let start = start.map(parse_one).transpose()?;
        let end = end.map(parse_one).transpose()?;

        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(AppError::InvalidDateRange);
            }
        }

        Ok(Self { start, end })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paginacao_padrao_e_limites() {
        let p = Pagination { page: None, page_size: None };
        assert_eq!(p.limit_offset(), (20, 0));

        let p = Pagination { page: Some(3), page_size: Some(50) };
        assert_eq!(p.limit_offset(), (50, 100));

        // page_size acima do teto é rebaixado
        let p = Pagination { page: Some(1), page_size: Some(10_000) };
        assert_eq!(p.limit_offset(), (200, 0));
    }

    #[test]
    fn intervalo_invertido_e_rejeitado() {
        let err = DateRange::parse(Some("2024-05-10"), Some("2024-05-01"));
        assert!(matches!(err, Err(AppError::InvalidDateRange)));
    }

    #[test]
    fn formato_de_data_invalido_e_rejeitado() {
        let err = DateRange::parse(Some("10/05/2024"), None);
        assert!(matches!(err, Err(AppError::InvalidDateRange)));
    }
}
