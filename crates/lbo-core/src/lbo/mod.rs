pub mod amortisation;
pub mod model;
pub mod projection;
pub mod returns;
pub mod schedule;
pub mod sensitivity;

use rust_decimal::Decimal;

use crate::error::LboError;
use crate::LboResult;

// Checked Decimal arithmetic for values driven by unbounded inputs. The
// operators panic past ~7.9e28; these surface a Domain error instead.

fn overflow(context: &str) -> LboError {
    LboError::Domain(format!("Arithmetic overflow computing {context}"))
}

pub(crate) fn mul(a: Decimal, b: Decimal, context: &str) -> LboResult<Decimal> {
    a.checked_mul(b).ok_or_else(|| overflow(context))
}

pub(crate) fn add(a: Decimal, b: Decimal, context: &str) -> LboResult<Decimal> {
    a.checked_add(b).ok_or_else(|| overflow(context))
}

pub(crate) fn sub(a: Decimal, b: Decimal, context: &str) -> LboResult<Decimal> {
    a.checked_sub(b).ok_or_else(|| overflow(context))
}

pub(crate) fn div(a: Decimal, b: Decimal, context: &str) -> LboResult<Decimal> {
    if b.is_zero() {
        return Err(LboError::DivisionByZero {
            context: context.into(),
        });
    }
    a.checked_div(b).ok_or_else(|| overflow(context))
}

pub(crate) fn sum<I>(values: I, context: &str) -> LboResult<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, v| add(acc, v, context))
}
