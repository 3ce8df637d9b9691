//! Stock reduction functions for `Rule::with_reducer`.

use crate::grammar::Rejected;
use crate::rendering::Rendered;
use crate::value::Value;

/// The first child.
pub fn id(children: Vec<Value>, _origin: usize) -> Result<Value, Rejected> {
    Ok(children.into_iter().next().unwrap_or(Value::Null))
}

/// The `n`th child (`Null` if the rule is shorter).
pub fn nth(n: usize) -> impl Fn(Vec<Value>, usize) -> Result<Value, Rejected> + Send + Sync + 'static {
    move |children, _| Ok(children.into_iter().nth(n).unwrap_or(Value::Null))
}

pub fn nuller(_children: Vec<Value>, _origin: usize) -> Result<Value, Rejected> {
    Ok(Value::Null)
}

/// The source text of all children, concatenated.
pub fn joiner(children: Vec<Value>, _origin: usize) -> Result<Value, Rejected> {
    Ok(Value::String(children.rendered()))
}

/// Child 0 followed by the items of the list in child 1.
pub fn concat(children: Vec<Value>, _origin: usize) -> Result<Value, Rejected> {
    let mut children = children.into_iter();
    let mut list: Vec<Value> = children.next().into_iter().collect();
    match children.next() {
        Some(Value::List(rest)) => list.extend(rest.iter().cloned()),
        Some(other) => list.push(other),
        None => {}
    }
    Ok(Value::list(list))
}

/// The items of the list in child 0 followed by child 1.
pub fn push(children: Vec<Value>, _origin: usize) -> Result<Value, Rejected> {
    let mut children = children.into_iter();
    let mut list = match children.next() {
        Some(Value::List(items)) => items.to_vec(),
        Some(other) => vec![other],
        None => Vec::new(),
    };
    list.extend(children.next());
    Ok(Value::list(list))
}

#[cfg(test)]
#[path = "tests/reduce.rs"]
mod tests_for_reduce;
