//! Aggregate timing statistics for a finished batch.

use lumenbatch_common::{BatchResult, PaymentStatus};

/// Fill the duration and counter fields from the per-payment results.
///
/// Still-pending payments have no duration and are excluded from every
/// average; an average with no data points is left at zero.
pub fn calculate_stats(res: &mut BatchResult) {
    res.overall_duration_ms = res.end_time - res.start_time;
    res.prepare_duration_ms = res.prepared_time - res.start_time;
    res.submit_duration_ms = res.all_submitted_time - res.prepared_time;
    res.wait_duration_ms = res.end_time - res.all_submitted_time;

    let mut duration_total: i64 = 0;
    let mut duration_success: i64 = 0;
    let mut duration_error: i64 = 0;
    let mut count_done: i64 = 0;

    for payment in &res.payments {
        let duration = payment.end_time.map(|end| end - payment.start_time);
        match payment.status {
            PaymentStatus::Pending => res.count_pending += 1,
            PaymentStatus::Completed => {
                res.count_success += 1;
                if let Some(d) = duration {
                    count_done += 1;
                    duration_total += d;
                    duration_success += d;
                }
            }
            PaymentStatus::Error => {
                res.count_error += 1;
                if let Some(d) = duration {
                    count_done += 1;
                    duration_total += d;
                    duration_error += d;
                }
            }
        }
    }

    if count_done > 0 {
        res.avg_duration_ms = duration_total / count_done;
    }

    if res.count_success > 0 {
        res.avg_success_duration_ms = duration_success / res.count_success;
    }

    if res.count_error > 0 {
        res.avg_error_duration_ms = duration_error / res.count_error;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use lumenbatch_common::{BatchError, BatchPaymentResult, TimeMs, Username};

    fn payment(start_ms: i64, end_ms: Option<i64>, status: PaymentStatus) -> BatchPaymentResult {
        let mut p = BatchPaymentResult::new(Username::new("u"));
        p.start_time = TimeMs::from_millis(start_ms);
        p.end_time = end_ms.map(TimeMs::from_millis);
        match status {
            PaymentStatus::Completed => {
                p.mark_completed();
                p.end_time = end_ms.map(TimeMs::from_millis);
            }
            PaymentStatus::Error => {
                p.mark_error(&BatchError::RecipientLookup);
                p.end_time = end_ms.map(TimeMs::from_millis);
            }
            PaymentStatus::Pending => {}
        }
        p
    }

    fn base_result() -> BatchResult {
        BatchResult {
            start_time: TimeMs::from_millis(1_000),
            prepared_time: TimeMs::from_millis(1_200),
            all_submitted_time: TimeMs::from_millis(1_500),
            end_time: TimeMs::from_millis(2_000),
            ..Default::default()
        }
    }

    #[test]
    fn test_stage_durations() {
        let mut res = base_result();
        calculate_stats(&mut res);

        assert_eq!(res.overall_duration_ms, 1_000);
        assert_eq!(res.prepare_duration_ms, 200);
        assert_eq!(res.submit_duration_ms, 300);
        assert_eq!(res.wait_duration_ms, 500);
    }

    #[test]
    fn test_counts_and_averages() {
        let mut res = base_result();
        res.payments = vec![
            payment(1_000, Some(1_100), PaymentStatus::Completed), // 100ms
            payment(1_000, Some(1_300), PaymentStatus::Completed), // 300ms
            payment(1_000, Some(1_050), PaymentStatus::Error),     // 50ms
            payment(1_000, None, PaymentStatus::Pending),
        ];
        calculate_stats(&mut res);

        assert_eq!(res.count_success, 2);
        assert_eq!(res.count_error, 1);
        assert_eq!(res.count_pending, 1);
        assert_eq!(res.avg_success_duration_ms, 200);
        assert_eq!(res.avg_error_duration_ms, 50);
        assert_eq!(res.avg_duration_ms, 150);
    }

    #[test]
    fn test_pending_excluded_from_averages() {
        let mut res = base_result();
        res.payments = vec![
            payment(1_000, None, PaymentStatus::Pending),
            payment(1_000, None, PaymentStatus::Pending),
        ];
        calculate_stats(&mut res);

        assert_eq!(res.count_pending, 2);
        assert_eq!(res.avg_duration_ms, 0);
        assert_eq!(res.avg_success_duration_ms, 0);
        assert_eq!(res.avg_error_duration_ms, 0);
    }

    #[test]
    fn test_empty_division_leaves_zero() {
        let mut res = base_result();
        res.payments = vec![payment(1_000, Some(1_400), PaymentStatus::Completed)];
        calculate_stats(&mut res);

        assert_eq!(res.avg_success_duration_ms, 400);
        assert_eq!(res.avg_error_duration_ms, 0);
    }
}
