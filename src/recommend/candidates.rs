use crate::code_model::{ClassInfo, MethodInfo, split_receiver};
use std::collections::BTreeSet;

/// Receivers of the method's qualified calls and field accesses.
fn receivers(method: &MethodInfo) -> impl Iterator<Item = &str> {
    method
        .calls
        .iter()
        .chain(method.field_accesses.iter())
        .filter_map(|target| split_receiver(target).map(|(receiver, _)| receiver))
}

/// Type names a plausible target class is expected to contain.
///
/// Parameter types, plus the declared types of receivers that are fields of
/// the owning class.
pub fn type_filters(method: &MethodInfo) -> BTreeSet<&str> {
    let mut filters: BTreeSet<&str> = method.parameters.iter().map(String::as_str).collect();
    filters.extend(receivers(method).filter_map(|receiver| method.receiver_type(receiver)));
    filters
}

/// Narrows `universe` to classes whose name contains one of the method's
/// type filters.
///
/// Matching is a case-sensitive substring test (filter `Order` also selects
/// `OrderHistory`). When nothing matches, the whole universe is returned so
/// every method still gets scored. Output follows universe order without
/// duplicates.
pub fn structural_candidates<'a, I>(method: &MethodInfo, universe: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let universe: Vec<&'a str> = universe.into_iter().collect();
    let filters = type_filters(method);

    let matched: Vec<&'a str> = universe
        .iter()
        .copied()
        .filter(|class_name| filters.iter().any(|filter| class_name.contains(filter)))
        .collect();

    if matched.is_empty() { universe } else { matched }
}

/// Classes the method depends on: parameter types and the types of receivers
/// resolved through the owning class's field table.
pub fn used_classes<'a>(method: &'a MethodInfo, owner: Option<&'a ClassInfo>) -> BTreeSet<&'a str> {
    let mut used: BTreeSet<&'a str> = method.parameters.iter().map(String::as_str).collect();
    if let Some(owner) = owner {
        used.extend(receivers(method).filter_map(|receiver| owner.field_type(receiver)));
    }
    used
}
