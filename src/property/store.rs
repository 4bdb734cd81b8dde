//! Backing storage for every property graph owned by one compositor.
//!
//! Graph handles ([`super::PropertyGraph`]) are thin: all values and
//! bindings live here so expressions can read across graphs.

use std::collections::VecDeque;

use rustc_hash::{FxHashMap, FxHashSet};

use super::expression::{Arguments, Expression, Parameter};
use super::graph::{GraphId, PropertyRef};
use super::value::{ScalarBounds, Value};
use crate::error::{Result, VistaError};

/// An installed expression plus its named parameters.
#[derive(Debug, Clone)]
pub(crate) struct Binding {
    pub(crate) expression: Expression,
    pub(crate) parameters: Vec<(String, Parameter)>,
}

impl Binding {
    pub(crate) fn references(&self) -> impl Iterator<Item = &PropertyRef> {
        self.parameters.iter().filter_map(|(_, p)| match p {
            Parameter::Reference(r) => Some(r),
            Parameter::Constant(_) => None,
        })
    }
}

#[derive(Debug)]
struct PropertySlot {
    value: Value,
    bounds: ScalarBounds,
    binding: Option<Binding>,
}

#[derive(Debug)]
struct GraphEntry {
    label: String,
    properties: FxHashMap<String, PropertySlot>,
}

#[derive(Debug, Default)]
pub(crate) struct PropertyStore {
    next_id: u64,
    graphs: FxHashMap<GraphId, GraphEntry>,
}

impl PropertyStore {
    // -- graphs ------------------------------------------------------------

    pub(crate) fn insert_graph(&mut self, label: &str) -> GraphId {
        self.next_id += 1;
        let id = GraphId(self.next_id);
        let _ = self.graphs.insert(
            id,
            GraphEntry {
                label: label.to_owned(),
                properties: FxHashMap::default(),
            },
        );
        id
    }

    pub(crate) fn contains_graph(&self, id: GraphId) -> bool {
        self.graphs.contains_key(&id)
    }

    pub(crate) fn graph_count(&self) -> usize {
        self.graphs.len()
    }

    /// Remove a graph. Bindings elsewhere that still read from it are
    /// evaluated one last time and then frozen as static values.
    pub(crate) fn remove_graph(&mut self, id: GraphId) {
        let dependents: Vec<PropertyRef> = self
            .bound_properties()
            .into_iter()
            .filter(|r| r.graph() != id)
            .filter(|r| {
                self.binding(r)
                    .is_some_and(|b| b.references().any(|s| s.graph() == id))
            })
            .collect();

        for r in &dependents {
            if let Err(e) = self.resolve(r) {
                log::warn!("final evaluation of {r} failed: {e}");
            }
            if let Some(slot) = self.slot_mut_opt(r) {
                slot.binding = None;
            }
            log::warn!("froze {r}: a graph it reads from was destroyed");
        }

        if let Some(entry) = self.graphs.remove(&id) {
            log::debug!(
                "removed graph '{}' ({} properties)",
                entry.label,
                entry.properties.len()
            );
        }
    }

    pub(crate) fn names(&self, id: GraphId) -> Vec<String> {
        let mut names: Vec<String> = self
            .graphs
            .get(&id)
            .map(|g| g.properties.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    // -- properties --------------------------------------------------------

    pub(crate) fn create(
        &mut self,
        r: &PropertyRef,
        initial: Value,
        bounds: ScalarBounds,
    ) -> Result<()> {
        let graph = self
            .graphs
            .get_mut(&r.graph())
            .ok_or_else(|| VistaError::UnknownProperty(r.to_string()))?;
        if graph.properties.contains_key(r.name()) {
            return Err(VistaError::DuplicateName(r.name().to_owned()));
        }
        let _ = graph.properties.insert(
            r.name().to_owned(),
            PropertySlot {
                value: initial.clamped(bounds),
                bounds,
                binding: None,
            },
        );
        Ok(())
    }

    pub(crate) fn write(&mut self, r: &PropertyRef, value: Value) -> Result<()> {
        let slot = self.slot_mut(r)?;
        if slot.binding.is_some() {
            return Err(VistaError::PropertyIsBound(r.name().to_owned()));
        }
        if slot.value.kind() != value.kind() {
            return Err(VistaError::TypeMismatch {
                name: r.name().to_owned(),
                expected: slot.value.kind(),
                found: value.kind(),
            });
        }
        slot.value = value.clamped(slot.bounds);
        Ok(())
    }

    pub(crate) fn is_bound(&self, r: &PropertyRef) -> Result<bool> {
        Ok(self.slot(r)?.binding.is_some())
    }

    pub(crate) fn binding_sources(
        &self,
        r: &PropertyRef,
    ) -> Result<Vec<PropertyRef>> {
        Ok(self
            .slot(r)?
            .binding
            .as_ref()
            .map(|b| b.references().cloned().collect())
            .unwrap_or_default())
    }

    pub(crate) fn binding_count(&self) -> usize {
        self.graphs
            .values()
            .flat_map(|g| g.properties.values())
            .filter(|s| s.binding.is_some())
            .count()
    }

    // -- bindings ----------------------------------------------------------

    /// Install `binding` on `r`, replacing any previous one. The new binding
    /// is evaluated once; if that fails the previous binding is restored.
    pub(crate) fn bind(&mut self, r: &PropertyRef, binding: Binding) -> Result<()> {
        let _ = self.slot(r)?;
        for source in binding.references() {
            let _ = self.slot(source)?;
            if source == r || self.depends_on(source, r) {
                return Err(VistaError::BindingCycle(r.name().to_owned()));
            }
        }

        let label = binding.expression.label();
        let previous = self.slot_mut(r)?.binding.replace(binding);
        if let Err(e) = self.resolve(r) {
            self.slot_mut(r)?.binding = previous;
            return Err(e);
        }
        log::debug!("bound {r} to '{label}'");
        Ok(())
    }

    /// Clear the binding on `r`, keeping a freshly evaluated value.
    pub(crate) fn unbind(&mut self, r: &PropertyRef) -> Result<()> {
        if !self.is_bound(r)? {
            return Ok(());
        }
        if let Err(e) = self.resolve(r) {
            log::warn!("final evaluation of {r} failed: {e}");
        }
        self.slot_mut(r)?.binding = None;
        log::debug!("unbound {r}");
        Ok(())
    }

    /// Whether `start` reads, directly or transitively, from `target`.
    fn depends_on(&self, start: &PropertyRef, target: &PropertyRef) -> bool {
        let mut stack = vec![start.clone()];
        let mut seen = FxHashSet::default();
        while let Some(current) = stack.pop() {
            if &current == target {
                return true;
            }
            if !seen.insert(current.clone()) {
                continue;
            }
            if let Some(binding) = self.binding(&current) {
                stack.extend(binding.references().cloned());
            }
        }
        false
    }

    // -- evaluation --------------------------------------------------------

    /// Current value of `r`. Bound properties are re-evaluated against the
    /// current values of their parameters, recursively.
    pub(crate) fn resolve(&mut self, r: &PropertyRef) -> Result<Value> {
        let (value, binding) = {
            let slot = self.slot(r)?;
            (slot.value, slot.binding.clone())
        };
        let Some(binding) = binding else {
            return Ok(value);
        };

        let mut values = Vec::with_capacity(binding.parameters.len());
        for (name, parameter) in &binding.parameters {
            let value = match parameter {
                Parameter::Constant(v) => *v,
                Parameter::Reference(source) => self.resolve(source)?,
            };
            values.push((name.clone(), value));
        }
        self.store_result(r, &binding, &values)
    }

    /// Evaluate every bound property once, in dependency order, reading
    /// upstream values from what this pass already stored.
    ///
    /// A failing expression keeps its previous value and is logged; the
    /// rest of the pass still runs. Returns how many properties were
    /// evaluated successfully.
    pub(crate) fn evaluate_all(&mut self) -> usize {
        let order = self.evaluation_order();
        let mut evaluated = 0;
        for r in &order {
            match self.evaluate_one(r) {
                Ok(()) => evaluated += 1,
                Err(e) => log::warn!("evaluation of {r} failed: {e}"),
            }
        }
        evaluated
    }

    fn evaluate_one(&mut self, r: &PropertyRef) -> Result<()> {
        let Some(binding) = self.binding(r).cloned() else {
            return Ok(());
        };
        let mut values = Vec::with_capacity(binding.parameters.len());
        for (name, parameter) in &binding.parameters {
            let value = match parameter {
                Parameter::Constant(v) => *v,
                Parameter::Reference(source) => self.slot(source)?.value,
            };
            values.push((name.clone(), value));
        }
        let _ = self.store_result(r, &binding, &values)?;
        Ok(())
    }

    /// Bound properties sorted so every property comes after the bound
    /// properties it reads from (Kahn's algorithm).
    pub(crate) fn evaluation_order(&self) -> Vec<PropertyRef> {
        let bound = self.bound_properties();
        let bound_set: FxHashSet<&PropertyRef> = bound.iter().collect();

        let mut in_degree: FxHashMap<&PropertyRef, usize> = FxHashMap::default();
        let mut dependents: FxHashMap<&PropertyRef, Vec<&PropertyRef>> =
            FxHashMap::default();
        for r in &bound {
            let sources: FxHashSet<&PropertyRef> = self
                .binding(r)
                .map(|b| b.references().filter(|s| bound_set.contains(s)).collect())
                .unwrap_or_default();
            let _ = in_degree.insert(r, sources.len());
            for source in sources {
                dependents.entry(source).or_default().push(r);
            }
        }

        let mut ready: VecDeque<&PropertyRef> = bound
            .iter()
            .filter(|r| in_degree.get(r).copied() == Some(0))
            .collect();
        let mut order = Vec::with_capacity(bound.len());
        while let Some(r) = ready.pop_front() {
            order.push(r.clone());
            for dependent in dependents.get(r).into_iter().flatten() {
                if let Some(degree) = in_degree.get_mut(dependent) {
                    *degree -= 1;
                    if *degree == 0 {
                        ready.push_back(*dependent);
                    }
                }
            }
        }
        if order.len() < bound.len() {
            log::warn!(
                "{} bound properties skipped: dependency cycle",
                bound.len() - order.len()
            );
        }
        order
    }

    fn store_result(
        &mut self,
        r: &PropertyRef,
        binding: &Binding,
        values: &[(String, Value)],
    ) -> Result<Value> {
        let value = binding.expression.evaluate(&Arguments::new(values))?;
        let slot = self.slot_mut(r)?;
        if slot.value.kind() != value.kind() {
            return Err(VistaError::TypeMismatch {
                name: r.name().to_owned(),
                expected: slot.value.kind(),
                found: value.kind(),
            });
        }
        slot.value = value.clamped(slot.bounds);
        Ok(slot.value)
    }

    // -- lookup ------------------------------------------------------------

    fn bound_properties(&self) -> Vec<PropertyRef> {
        let mut bound: Vec<PropertyRef> = self
            .graphs
            .iter()
            .flat_map(|(id, g)| {
                g.properties
                    .iter()
                    .filter(|(_, s)| s.binding.is_some())
                    .map(|(name, _)| PropertyRef::new(*id, name))
            })
            .collect();
        bound.sort();
        bound
    }

    fn binding(&self, r: &PropertyRef) -> Option<&Binding> {
        self.graphs
            .get(&r.graph())
            .and_then(|g| g.properties.get(r.name()))
            .and_then(|s| s.binding.as_ref())
    }

    fn slot(&self, r: &PropertyRef) -> Result<&PropertySlot> {
        self.graphs
            .get(&r.graph())
            .and_then(|g| g.properties.get(r.name()))
            .ok_or_else(|| VistaError::UnknownProperty(r.to_string()))
    }

    fn slot_mut(&mut self, r: &PropertyRef) -> Result<&mut PropertySlot> {
        self.slot_mut_opt(r)
            .ok_or_else(|| VistaError::UnknownProperty(r.to_string()))
    }

    fn slot_mut_opt(&mut self, r: &PropertyRef) -> Option<&mut PropertySlot> {
        self.graphs
            .get_mut(&r.graph())
            .and_then(|g| g.properties.get_mut(r.name()))
    }
}
