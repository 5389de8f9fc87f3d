// src/services/statement_service.rs
//
// O motor de reconciliação (extrato de conferência). SOMENTE LEITURA: refaz
// os agregados a partir dos pedidos e pagamentos do intervalo, sem tocar no
// razão. O ponto delicado é a deduplicação: o mesmo dinheiro pode aparecer
// no payment_amount do retorno E na tabela de pagamentos (registro
// implícito), e o fee de um pedido multi-item não pode ser somado uma vez
// por linha.

use std::collections::{BTreeMap, HashSet};

use rust_decimal::Decimal;

use crate::{
    common::db_utils::DateRange,
    common::error::AppError,
    db::{FactoryRepository, StatementRepository},
    models::statement::{
        PaymentRow, ProcessComparison, ReceiveItemRow, SendItemRow, StatementOrder,
        StatementQuery, StatementReport, StyleSummary,
    },
};

#[derive(Clone)]
pub struct StatementService {
    statement_repo: StatementRepository,
    factory_repo: FactoryRepository,
}

impl StatementService {
    pub fn new(statement_repo: StatementRepository, factory_repo: FactoryRepository) -> Self {
        Self {
            statement_repo,
            factory_repo,
        }
    }

    pub async fn generate(
        &self,
        org_id: i64,
        query: &StatementQuery,
    ) -> Result<StatementReport, AppError> {
        let range = DateRange::parse(query.start_date.as_deref(), query.end_date.as_deref())?;

        let factory = self
            .factory_repo
            .find_by_name(org_id, &query.factory_name)
            .await?
            .ok_or(AppError::FactoryNotFound)?;

        let send_items = self
            .statement_repo
            .send_items_in_range(org_id, factory.id, range, query.product_id)
            .await?;
        let receive_items = self
            .statement_repo
            .receive_items_in_range(org_id, factory.id, range, query.product_id)
            .await?;
        let payments = self
            .statement_repo
            .payments_in_range(org_id, factory.id, range)
            .await?;
        let known_order_nos: HashSet<String> = self
            .statement_repo
            .receive_order_numbers(org_id)
            .await?
            .into_iter()
            .collect();

        Ok(build_statement(
            factory.id,
            &factory.name,
            query.start_date.clone(),
            query.end_date.clone(),
            &send_items,
            &receive_items,
            &payments,
            &known_order_nos,
        ))
    }
}

#[derive(Default)]
struct StyleAgg {
    send_weight: Decimal,
    receive_weight: Decimal,
    quantity: i32,
    fee: Decimal,
    paid: Decimal,
}

#[derive(Default)]
struct ProcessAgg {
    send_weight: Decimal,
    receive_weight: Decimal,
}

struct SendOrderAgg {
    order_no: String,
    order_date: chrono::DateTime<chrono::Utc>,
    process_name: String,
    weight: Decimal,
    quantity: i32,
}

struct ReceiveOrderAgg {
    order_no: String,
    order_date: chrono::DateTime<chrono::Utc>,
    process_name: String,
    weight: Decimal,
    quantity: i32,
    total_fee: Decimal,
    payment_amount: Decimal,
    // fee por modelo DENTRO deste pedido, para ratear o pagamento
    style_fees: BTreeMap<String, Decimal>,
}

// O agregador puro do extrato. Regras de deduplicação:
// - fee conta UMA vez por pedido de retorno (não por linha);
// - fee por modelo soma as linhas, independente da dedup por pedido;
// - pagamento embutido conta uma vez por order_no;
// - pagamentos da tabela cujo payment_no é um order_no conhecido são
//   implícitos e ficam de fora (já contados no pedido);
// - a chave composta fonte_numero_valor_data protege contra dupla
//   contagem residual entre as duas fontes.
#[allow(clippy::too_many_arguments)]
pub fn build_statement(
    factory_id: i64,
    factory_name: &str,
    start_date: Option<String>,
    end_date: Option<String>,
    send_items: &[SendItemRow],
    receive_items: &[ReceiveItemRow],
    payments: &[PaymentRow],
    known_receive_order_nos: &HashSet<String>,
) -> StatementReport {
    let mut send_weight = Decimal::ZERO;
    let mut receive_weight = Decimal::ZERO;
    let mut total_fee = Decimal::ZERO;

    let mut styles: BTreeMap<String, StyleAgg> = BTreeMap::new();
    let mut processes: BTreeMap<String, ProcessAgg> = BTreeMap::new();
    let mut send_orders: BTreeMap<i64, SendOrderAgg> = BTreeMap::new();
    let mut receive_orders: BTreeMap<i64, ReceiveOrderAgg> = BTreeMap::new();

    for row in send_items {
        send_weight += row.weight;

        let style = styles.entry(row.product_no.clone()).or_default();
        style.send_weight += row.weight;

        let process = processes.entry(row.process_name.clone()).or_default();
        process.send_weight += row.weight;

        let order = send_orders
            .entry(row.order_id)
            .or_insert_with(|| SendOrderAgg {
                order_no: row.order_no.clone(),
                order_date: row.order_date,
                process_name: row.process_name.clone(),
                weight: Decimal::ZERO,
                quantity: 0,
            });
        order.weight += row.weight;
        order.quantity += row.quantity;
    }

    for row in receive_items {
        receive_weight += row.weight;

        let style = styles.entry(row.product_no.clone()).or_default();
        style.receive_weight += row.weight;
        style.quantity += row.quantity;
        style.fee += row.fee;

        let process = processes.entry(row.process_name.clone()).or_default();
        process.receive_weight += row.weight;

        let order = match receive_orders.entry(row.order_id) {
            std::collections::btree_map::Entry::Vacant(vacant) => {
                // primeira linha deste pedido: o fee do PEDIDO entra aqui,
                // uma única vez
                total_fee += row.total_fee;
                vacant.insert(ReceiveOrderAgg {
                    order_no: row.order_no.clone(),
                    order_date: row.order_date,
                    process_name: row.process_name.clone(),
                    weight: Decimal::ZERO,
                    quantity: 0,
                    total_fee: row.total_fee,
                    payment_amount: row.payment_amount,
                    style_fees: BTreeMap::new(),
                })
            }
            std::collections::btree_map::Entry::Occupied(occupied) => occupied.into_mut(),
        };
        order.weight += row.weight;
        order.quantity += row.quantity;
        *order.style_fees.entry(row.product_no.clone()).or_default() += row.fee;
    }

    // ---- pagamentos, com dedup entre as duas fontes ----

    let mut paid_amount = Decimal::ZERO;
    let mut seen_payment_keys: HashSet<String> = HashSet::new();

    // (a) pagamento embutido no retorno, um por order_no
    for order in receive_orders.values() {
        if order.payment_amount <= Decimal::ZERO {
            continue;
        }

        let key = format!(
            "order_{}_{}_{}",
            order.order_no,
            order.payment_amount,
            order.order_date.date_naive()
        );
        if !seen_payment_keys.insert(key) {
            continue;
        }

        paid_amount += order.payment_amount;

        // rateia o pagamento do pedido entre os modelos proporcionalmente
        // ao fee de cada um; pedido sem fee divide em partes iguais
        if order.total_fee > Decimal::ZERO {
            for (style_no, style_fee) in &order.style_fees {
                if let Some(style) = styles.get_mut(style_no) {
                    style.paid += order.payment_amount * style_fee / order.total_fee;
                }
            }
        } else if !order.style_fees.is_empty() {
            let share = order.payment_amount / Decimal::from(order.style_fees.len() as i64);
            for style_no in order.style_fees.keys() {
                if let Some(style) = styles.get_mut(style_no) {
                    style.paid += share;
                }
            }
        }
    }

    // (b) pagamentos da tabela, pulando os implícitos
    for payment in payments {
        if known_receive_order_nos.contains(&payment.payment_no) {
            continue;
        }

        let key = format!(
            "direct_{}_{}_{}",
            payment.payment_no,
            payment.amount,
            payment.paid_at.date_naive()
        );
        if !seen_payment_keys.insert(key) {
            continue;
        }

        paid_amount += payment.amount;
    }

    // ---- verificação cruzada (aviso, nunca erro) ----

    let style_fee_sum: Decimal = styles.values().map(|s| s.fee).sum();
    if (style_fee_sum - total_fee).abs() > Decimal::new(1, 2) {
        tracing::warn!(
            %style_fee_sum,
            %total_fee,
            "soma dos fees por modelo diverge do total por pedido no extrato"
        );
    }

    // ---- montagem da saída ----

    let loss_rate = loss_rate_percent(send_weight, receive_weight);
    let unpaid_amount = total_fee - paid_amount;

    let process_comparison = processes
        .into_iter()
        .map(|(name, agg)| ProcessComparison {
            loss_rate: loss_rate_percent(agg.send_weight, agg.receive_weight),
            process_name: name,
            send_weight: agg.send_weight,
            receive_weight: agg.receive_weight,
        })
        .collect();

    let style_summary = styles
        .into_iter()
        .map(|(product_no, agg)| StyleSummary {
            product_no,
            send_weight: agg.send_weight,
            receive_weight: agg.receive_weight,
            quantity: agg.quantity,
            fee: agg.fee,
            paid_amount: agg.paid.round_dp(2),
        })
        .collect();

    let mut orders: Vec<StatementOrder> = send_orders
        .into_values()
        .map(|o| StatementOrder {
            kind: "send".to_string(),
            order_no: o.order_no,
            order_date: o.order_date,
            process_name: o.process_name,
            weight: o.weight,
            quantity: o.quantity,
            fee: None,
            payment_amount: None,
        })
        .chain(receive_orders.into_values().map(|o| StatementOrder {
            kind: "receive".to_string(),
            order_no: o.order_no,
            order_date: o.order_date,
            process_name: o.process_name,
            weight: o.weight,
            quantity: o.quantity,
            fee: Some(o.total_fee),
            payment_amount: Some(o.payment_amount),
        }))
        .collect();
    orders.sort_by(|a, b| a.order_date.cmp(&b.order_date).then(a.order_no.cmp(&b.order_no)));

    StatementReport {
        factory_id,
        factory_name: factory_name.to_string(),
        start_date,
        end_date,
        send_weight,
        receive_weight,
        loss_rate,
        total_fee,
        paid_amount,
        unpaid_amount,
        process_comparison,
        style_summary,
        orders,
    }
}

// (enviado - recebido) / enviado * 100, com duas casas; 0 sem remessa.
fn loss_rate_percent(send_weight: Decimal, receive_weight: Decimal) -> Decimal {
    if send_weight.is_zero() {
        return Decimal::ZERO;
    }
    ((send_weight - receive_weight) / send_weight * Decimal::from(100)).round_dp(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn date(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, 10, 0, 0).unwrap()
    }

    fn dec(v: i64) -> Decimal {
        Decimal::from(v)
    }

    fn send_row(order_id: i64, order_no: &str, product_no: &str, weight: i64) -> SendItemRow {
        SendItemRow {
            order_id,
            order_no: order_no.to_string(),
            order_date: date(1),
            process_name: "Costura".to_string(),
            product_no: product_no.to_string(),
            weight: dec(weight),
            quantity: 10,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn receive_row(
        order_id: i64,
        order_no: &str,
        product_no: &str,
        weight: i64,
        fee: i64,
        total_fee: i64,
        payment: i64,
        day: u32,
    ) -> ReceiveItemRow {
        ReceiveItemRow {
            order_id,
            order_no: order_no.to_string(),
            order_date: date(day),
            process_name: "Costura".to_string(),
            product_no: product_no.to_string(),
            weight: dec(weight),
            quantity: 10,
            fee: dec(fee),
            total_fee: dec(total_fee),
            payment_amount: dec(payment),
        }
    }

    fn payment_row(payment_no: &str, amount: i64, day: u32) -> PaymentRow {
        PaymentRow {
            payment_no: payment_no.to_string(),
            amount: dec(amount),
            paid_at: date(day),
        }
    }

    fn build(
        send: &[SendItemRow],
        receive: &[ReceiveItemRow],
        payments: &[PaymentRow],
        known: &[&str],
    ) -> StatementReport {
        let known: HashSet<String> = known.iter().map(|s| s.to_string()).collect();
        build_statement(1, "Facção Teste", None, None, send, receive, payments, &known)
    }

    #[test]
    fn fee_de_pedido_multi_item_conta_uma_vez() {
        // pedido S0001 com duas linhas: o total_fee (100) não pode dobrar
        let receive = [
            receive_row(1, "S0001", "ST-01", 30, 60, 100, 0, 2),
            receive_row(1, "S0001", "ST-02", 20, 40, 100, 0, 2),
        ];
        let report = build(&[], &receive, &[], &["S0001"]);

        assert_eq!(report.total_fee, dec(100));
        // enquanto o resumo por modelo soma os fees de LINHA
        let fees: Vec<Decimal> = report.style_summary.iter().map(|s| s.fee).collect();
        assert_eq!(fees, vec![dec(60), dec(40)]);
    }

    #[test]
    fn conservacao_de_fee_entre_pedido_e_modelos() {
        let receive = [
            receive_row(1, "S0001", "ST-01", 30, 60, 100, 0, 2),
            receive_row(1, "S0001", "ST-02", 20, 40, 100, 0, 2),
            receive_row(2, "S0002", "ST-01", 15, 75, 75, 0, 3),
        ];
        let report = build(&[], &receive, &[], &["S0001", "S0002"]);

        let style_sum: Decimal = report.style_summary.iter().map(|s| s.fee).sum();
        assert!((style_sum - report.total_fee).abs() <= Decimal::new(1, 2));
    }

    #[test]
    fn pagamento_implicito_nao_conta_duas_vezes() {
        // retorno com pagamento embutido de 50 E o registro implícito
        // correspondente na tabela de pagamentos (mesmo número): 50, não 100
        let receive = [receive_row(1, "S0001", "ST-01", 30, 100, 100, 50, 2)];
        let payments = [payment_row("S0001", 50, 2)];
        let report = build(&[], &receive, &payments, &["S0001"]);

        assert_eq!(report.paid_amount, dec(50));
        assert_eq!(report.unpaid_amount, dec(50));
    }

    #[test]
    fn pagamento_direto_soma_com_o_embutido() {
        let receive = [receive_row(1, "S0001", "ST-01", 30, 100, 100, 40, 2)];
        let payments = [payment_row("P0001", 35, 5)];
        let report = build(&[], &receive, &payments, &["S0001"]);

        assert_eq!(report.paid_amount, dec(75));
        assert_eq!(report.unpaid_amount, dec(25));
    }

    #[test]
    fn taxa_de_perda_e_calculada_sobre_o_peso_enviado() {
        let send = [send_row(1, "F0001", "ST-01", 100)];
        let receive = [receive_row(2, "S0001", "ST-01", 90, 0, 0, 0, 2)];
        let report = build(&send, &receive, &[], &["S0001"]);

        assert_eq!(report.loss_rate, dec(10));
    }

    #[test]
    fn sem_remessa_a_taxa_de_perda_e_zero() {
        let receive = [receive_row(1, "S0001", "ST-01", 10, 0, 0, 0, 2)];
        let report = build(&[], &receive, &[], &["S0001"]);

        assert_eq!(report.loss_rate, Decimal::ZERO);
    }

    #[test]
    fn pagamento_rateado_proporcional_ao_fee_de_cada_modelo() {
        // fee 100 (60/40), pagamento 50 -> 30 para ST-01, 20 para ST-02
        let receive = [
            receive_row(1, "S0001", "ST-01", 30, 60, 100, 50, 2),
            receive_row(1, "S0001", "ST-02", 20, 40, 100, 50, 2),
        ];
        let report = build(&[], &receive, &[], &["S0001"]);

        let by_style: BTreeMap<&str, Decimal> = report
            .style_summary
            .iter()
            .map(|s| (s.product_no.as_str(), s.paid_amount))
            .collect();
        assert_eq!(by_style["ST-01"], dec(30));
        assert_eq!(by_style["ST-02"], dec(20));
    }

    #[test]
    fn pedido_sem_fee_rateia_o_pagamento_em_partes_iguais() {
        let receive = [
            receive_row(1, "S0001", "ST-01", 30, 0, 0, 50, 2),
            receive_row(1, "S0001", "ST-02", 20, 0, 0, 50, 2),
        ];
        let report = build(&[], &receive, &[], &["S0001"]);

        let by_style: BTreeMap<&str, Decimal> = report
            .style_summary
            .iter()
            .map(|s| (s.product_no.as_str(), s.paid_amount))
            .collect();
        assert_eq!(by_style["ST-01"], dec(25));
        assert_eq!(by_style["ST-02"], dec(25));
    }

    #[test]
    fn comparativo_por_processo_acompanha_os_pesos() {
        let mut send = send_row(1, "F0001", "ST-01", 80);
        send.process_name = "Tinturaria".to_string();
        let mut receive = receive_row(2, "S0001", "ST-01", 60, 0, 0, 0, 2);
        receive.process_name = "Tinturaria".to_string();

        let report = build(&[send], &[receive], &[], &["S0001"]);

        assert_eq!(report.process_comparison.len(), 1);
        let process = &report.process_comparison[0];
        assert_eq!(process.process_name, "Tinturaria");
        assert_eq!(process.send_weight, dec(80));
        assert_eq!(process.receive_weight, dec(60));
        assert_eq!(process.loss_rate, dec(25));
    }

    #[test]
    fn lista_de_pedidos_mistura_remessas_e_retornos_em_ordem() {
        let send = [send_row(1, "F0001", "ST-01", 50)];
        let receive = [receive_row(2, "S0001", "ST-01", 45, 10, 10, 0, 2)];
        let report = build(&send, &receive, &[], &["S0001"]);

        let kinds: Vec<&str> = report.orders.iter().map(|o| o.kind.as_str()).collect();
        assert_eq!(kinds, vec!["send", "receive"]);
    }
}
