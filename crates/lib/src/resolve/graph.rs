//! Transitive resolution of a descriptor's requirements.
//!
//! Resolution walks requirements breadth-first from the descriptor's own
//! declarations. Runtime requirements start in the host context and
//! build-only requirements in the build context; a package's `requires` stay
//! in its context while its `tool_requires` always land in the build
//! context. Enabled boolean flags pull in the package's conditional
//! requirements, so overrides can grow the graph.

use std::collections::{BTreeMap, HashMap, VecDeque};

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::{debug, trace};

use super::catalog::Catalog;
use super::types::{BuildContext, BuildPlan, PackageManifest, PlanContent, ResolveError, ResolvedPackage};
use crate::options::{OptionTable, OptionValue};
use crate::requirements::{Reference, RequirementKind, RequirementSet};
use crate::util::hash::Hashable;

const ROOT: &str = "the descriptor";

struct Pending {
  reference: Reference,
  context: BuildContext,
  /// Index of the dependent node, `None` for the descriptor itself.
  dependent: Option<usize>,
}

struct Node<'c> {
  manifest: &'c PackageManifest,
  context: BuildContext,
  options: BTreeMap<String, OptionValue>,
}

/// Expand `requirements` against `catalog` into a build plan.
///
/// # Errors
///
/// - [`ResolveError::MissingPackage`] if a pinned reference is not published
/// - [`ResolveError::VersionConflict`] if one name is pinned at two versions
///   within a context
/// - [`ResolveError::UnknownFlag`] / [`ResolveError::InvalidValue`] if an
///   override does not fit the dependency's declared options
/// - [`ResolveError::UnresolvedOverride`] if an override targets a package
///   outside the graph
/// - [`ResolveError::Cycle`] if the dependencies form a cycle
pub fn resolve(catalog: &Catalog, requirements: &RequirementSet, options: &OptionTable) -> Result<BuildPlan, ResolveError> {
  let mut queue: VecDeque<Pending> = requirements
    .iter()
    .map(|requirement| Pending {
      reference: requirement.reference(),
      context: match requirement.kind {
        RequirementKind::Runtime => BuildContext::Host,
        RequirementKind::BuildOnly => BuildContext::Build,
      },
      dependent: None,
    })
    .collect();

  let mut nodes: Vec<Node<'_>> = Vec::new();
  let mut index: HashMap<(BuildContext, String), usize> = HashMap::new();
  let mut edges: Vec<(usize, usize)> = Vec::new();

  while let Some(pending) = queue.pop_front() {
    let Reference { name, version } = &pending.reference;
    let required_by = match pending.dependent {
      Some(i) => format!("{}/{}", nodes[i].manifest.name, nodes[i].manifest.version),
      None => ROOT.to_string(),
    };

    let key = (pending.context, name.clone());
    if let Some(&existing) = index.get(&key) {
      let existing_version = &nodes[existing].manifest.version;
      if existing_version != version {
        return Err(ResolveError::VersionConflict {
          name: name.clone(),
          context: pending.context,
          existing: existing_version.clone(),
          requested: version.clone(),
          required_by,
        });
      }
      if let Some(dependent) = pending.dependent {
        edges.push((existing, dependent));
      }
      continue;
    }

    let manifest = catalog.get(name, version).ok_or_else(|| ResolveError::MissingPackage {
      name: name.clone(),
      version: version.clone(),
      required_by: required_by.clone(),
    })?;

    let effective = effective_options(manifest, options)?;
    trace!(package = %pending.reference, context = %pending.context, "package resolved");

    let id = nodes.len();
    index.insert(key, id);
    if let Some(dependent) = pending.dependent {
      edges.push((id, dependent));
    }

    let mut next = Vec::new();
    for reference in &manifest.requires {
      next.push((reference.as_str(), pending.context));
    }
    for reference in &manifest.tool_requires {
      next.push((reference.as_str(), BuildContext::Build));
    }
    for (flag, references) in &manifest.conditional_requires {
      if effective.get(flag).and_then(OptionValue::as_bool) == Some(true) {
        debug!(package = %pending.reference, flag = %flag, "conditional requirements enabled");
        for reference in references {
          next.push((reference.as_str(), pending.context));
        }
      }
    }
    for (reference, context) in next {
      queue.push_back(Pending {
        reference: Reference::parse(reference)?,
        context,
        dependent: Some(id),
      });
    }

    nodes.push(Node {
      manifest,
      context: pending.context,
      options: effective,
    });
  }

  for dependency in options.dependencies() {
    if !nodes.iter().any(|node| node.manifest.name == dependency) {
      return Err(ResolveError::UnresolvedOverride {
        dependency: dependency.to_string(),
      });
    }
  }

  let mut graph: DiGraph<usize, ()> = DiGraph::new();
  let indices: Vec<NodeIndex> = (0..nodes.len()).map(|i| graph.add_node(i)).collect();
  for &(dependency, dependent) in &edges {
    graph.update_edge(indices[dependency], indices[dependent], ());
  }

  let order = toposort(&graph, None).map_err(|cycle| ResolveError::Cycle {
    package: nodes[graph[cycle.node_id()]].manifest.name.clone(),
  })?;

  let mut requires: Vec<Vec<String>> = vec![Vec::new(); nodes.len()];
  for &(dependency, dependent) in &edges {
    let reference = format!("{}/{}", nodes[dependency].manifest.name, nodes[dependency].manifest.version);
    if !requires[dependent].contains(&reference) {
      requires[dependent].push(reference);
    }
  }

  let packages: Vec<ResolvedPackage> = order
    .into_iter()
    .map(|idx| {
      let i = graph[idx];
      let node = &nodes[i];
      ResolvedPackage {
        name: node.manifest.name.clone(),
        version: node.manifest.version.clone(),
        context: node.context,
        options: node.options.clone(),
        requires: std::mem::take(&mut requires[i]),
      }
    })
    .collect();

  let id = PlanContent { packages: &packages }.compute_hash()?;
  debug!(plan = %id, packages = packages.len(), "build plan resolved");

  Ok(BuildPlan { id, packages })
}

/// Manifest defaults overlaid with the consumer's overrides for this package.
fn effective_options(manifest: &PackageManifest, options: &OptionTable) -> Result<BTreeMap<String, OptionValue>, ResolveError> {
  let mut effective: BTreeMap<String, OptionValue> = manifest
    .options
    .iter()
    .map(|(flag, spec)| (flag.clone(), spec.default.clone()))
    .collect();

  for (flag, value) in options.for_dependency(&manifest.name) {
    let spec = manifest.options.get(flag).ok_or_else(|| ResolveError::UnknownFlag {
      dependency: manifest.name.clone(),
      flag: flag.to_string(),
    })?;

    if !spec.allows(value) {
      return Err(ResolveError::InvalidValue {
        dependency: manifest.name.clone(),
        flag: flag.to_string(),
        value: value.to_string(),
        allowed: spec.values.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "),
      });
    }

    effective.insert(flag.to_string(), value.clone());
  }

  Ok(effective)
}
