// src/services/ledger.rs

use rust_decimal::Decimal;

// A posição da conta corrente de uma facção num instante:
// balance = crédito da organização junto à facção,
// debt    = quanto a organização deve à facção.
// Invariante de liquidação: depois de `settle`, no máximo um dos dois é
// positivo — o fee consome o crédito primeiro, o pagamento abate a dívida
// restante e o excedente vira crédito.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountPosition {
    pub balance: Decimal,
    pub debt: Decimal,
}

impl AccountPosition {
    pub fn new(balance: Decimal, debt: Decimal) -> Self {
        Self { balance, debt }
    }
}

// Liquidação aplicada na criação de um retorno (e, com fee = 0, no
// lançamento de um pagamento direto):
// 1. o fee consome o crédito; o que faltar vira dívida;
// 2. o pagamento abate a dívida; o excedente vira crédito.
pub fn settle(position: AccountPosition, fee: Decimal, payment: Decimal) -> AccountPosition {
    let mut balance = position.balance;
    let mut debt = position.debt;

    if balance >= fee {
        balance -= fee;
    } else {
        debt += fee - balance;
        balance = Decimal::ZERO;
    }

    if debt > Decimal::ZERO {
        if payment >= debt {
            balance += payment - debt;
            debt = Decimal::ZERO;
        } else {
            debt -= payment;
        }
    } else {
        balance += payment;
    }

    warn_if_negative("settle", balance, debt);
    AccountPosition { balance, debt }
}

// Inverso da liquidação, aplicado ao estado ATUAL da conta quando um
// pedido é anulado (não a um snapshot da criação). O lock de linha da
// fábrica serializa as mutações por facção, o que mantém essa reversão
// correta mesmo sob concorrência.
pub fn unwind(position: AccountPosition, fee: Decimal, payment: Decimal) -> AccountPosition {
    let mut balance = position.balance;
    let mut debt = position.debt;

    // desfaz o pagamento
    if balance >= payment {
        balance -= payment;
    } else {
        debt += payment - balance;
        balance = Decimal::ZERO;
    }

    // desfaz o fee
    if debt >= fee {
        debt -= fee;
    } else {
        balance += fee - debt;
        debt = Decimal::ZERO;
    }

    warn_if_negative("unwind", balance, debt);
    AccountPosition { balance, debt }
}

// Dívida sem teto é um estado de negócio aceito: valores negativos são
// apenas logados, nunca rejeitados.
fn warn_if_negative(op: &str, balance: Decimal, debt: Decimal) {
    if balance.is_sign_negative() || debt.is_sign_negative() {
        tracing::warn!(
            op,
            %balance,
            %debt,
            "posição da conta ficou negativa após a liquidação"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(v: i64) -> Decimal {
        Decimal::from(v)
    }

    fn pos(balance: i64, debt: i64) -> AccountPosition {
        AccountPosition::new(dec(balance), dec(debt))
    }

    #[test]
    fn fee_consome_credito_antes_de_virar_divida() {
        // crédito cobre o fee inteiro
        assert_eq!(settle(pos(100, 0), dec(40), dec(0)), pos(60, 0));
        // crédito cobre só uma parte
        assert_eq!(settle(pos(30, 0), dec(100), dec(0)), pos(0, 70));
    }

    #[test]
    fn pagamento_abate_divida_e_excedente_vira_credito() {
        assert_eq!(settle(pos(0, 80), dec(0), dec(50)), pos(0, 30));
        assert_eq!(settle(pos(0, 80), dec(0), dec(100)), pos(20, 0));
        // sem dívida, o pagamento inteiro vira crédito
        assert_eq!(settle(pos(10, 0), dec(0), dec(25)), pos(35, 0));
    }

    #[test]
    fn apos_liquidar_nunca_ha_credito_e_divida_simultaneos() {
        let starts = [pos(0, 0), pos(50, 0), pos(0, 50)];
        let events = [(0, 0), (100, 0), (0, 100), (100, 40), (40, 100), (70, 70)];

        for start in starts {
            for (fee, pay) in events {
                let after = settle(start, dec(fee), dec(pay));
                assert!(
                    after.balance.is_zero() || after.debt.is_zero(),
                    "saldo e dívida positivos ao mesmo tempo: {after:?} (início {start:?}, fee {fee}, pagamento {pay})"
                );
            }
        }
    }

    #[test]
    fn anular_desfaz_exatamente_a_criacao() {
        // round-trip: settle seguido de unwind com o mesmo evento restaura
        // a posição original, para qualquer posição liquidada de partida.
        let starts = [pos(0, 0), pos(120, 0), pos(0, 85), pos(3, 0)];
        let events = [(0, 0), (100, 0), (0, 150), (100, 40), (10, 4), (40, 100)];

        for start in starts {
            for (fee, pay) in events {
                let settled = settle(start, dec(fee), dec(pay));
                let unwound = unwind(settled, dec(fee), dec(pay));
                assert_eq!(
                    unwound, start,
                    "round-trip divergiu (início {start:?}, fee {fee}, pagamento {pay})"
                );
            }
        }
    }

    #[test]
    fn cenario_divida_seguida_de_pagamento_integral() {
        // retorno com fee 100 sem pagamento
        let after_order = settle(pos(0, 0), dec(100), dec(0));
        assert_eq!(after_order, pos(0, 100));

        // pagamento direto de 150: quita a dívida e sobra crédito de 50
        let after_payment = settle(after_order, dec(0), dec(150));
        assert_eq!(after_payment, pos(50, 0));
    }

    #[test]
    fn cenario_anulacao_de_pagamento_restaura_a_divida() {
        // continuação do cenário acima: anular o pagamento de 150
        let reverted = unwind(pos(50, 0), dec(0), dec(150));
        assert_eq!(reverted, pos(0, 100));
    }

    #[test]
    fn fee_e_pagamento_no_mesmo_pedido() {
        // retorno de fee 100 pago na hora com 60: sobra dívida de 40
        assert_eq!(settle(pos(0, 0), dec(100), dec(60)), pos(0, 40));
        // pagamento maior que o fee: sobra crédito
        assert_eq!(settle(pos(0, 0), dec(100), dec(130)), pos(30, 0));
    }
}
