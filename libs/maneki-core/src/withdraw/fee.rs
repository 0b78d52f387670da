use maneki_shared::WithdrawalPreview;

/// Practical floors on the USDT payout network. Paying out less than
/// this nets the user almost nothing after the transfer fee.
pub const MIN_GROSS_PAYOUT: f64 = 10.0;
pub const MIN_NET_PAYOUT: f64 = 8.5;

/// Preset amounts (in the balance currency) offered as quick buttons.
pub const QUICK_AMOUNTS: [f64; 4] = [10.0, 25.0, 50.0, 100.0];

pub fn can_withdraw(amount_gross: f64, amount_net: f64) -> bool {
    amount_gross >= MIN_GROSS_PAYOUT && amount_net >= MIN_NET_PAYOUT
}

/// Pure gross/fee/net arithmetic for a requested amount.
pub fn compute(amount_requested: f64, rate_to_payout: f64, network_fee: f64) -> WithdrawalPreview {
    let amount_gross = amount_requested * rate_to_payout;
    let amount_net = amount_gross - network_fee;
    WithdrawalPreview {
        amount_requested,
        amount_gross,
        network_fee,
        amount_net,
        can_withdraw: can_withdraw(amount_gross, amount_net),
    }
}

/// Rough balance-currency to USDT rates used ONLY to label the quick
/// amount buttons. Submission and fee figures always come from the
/// remote preview, never from this table.
pub fn approx_payout_rate(currency: &str) -> f64 {
    match currency {
        "USD" => 1.0,
        "EUR" => 1.08,
        "RUB" => 0.011,
        _ => 1.0,
    }
}

/// (source amount, approximate payout) pairs for the quick buttons.
pub fn quick_amount_estimates(currency: &str) -> Vec<(f64, f64)> {
    let rate = approx_payout_rate(currency);
    QUICK_AMOUNTS.iter().map(|&a| (a, a * rate)).collect()
}
