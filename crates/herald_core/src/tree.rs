//! The command tree.
//!
//! A trie of literal and parameter nodes built from ingested declarations.
//! Nodes live in an arena indexed by [`NodeId`]; leaves hold
//! [`ExecutableCommand`]s in a parallel arena indexed by [`ExecutableId`].
//! Children are stored by index, so no node holds a back-pointer to its
//! parent or its leaf.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use herald_foundation::{AnnotationList, Error, Result};

use crate::actor::Actor;
use crate::declaration::{ChainElement, CommandHandler, IngestedCommand, IngestedParameter};
use crate::parameter::ContextResolverRef;
use crate::path::{CommandPath, Segment};
use crate::precondition::{ConditionRef, PermissionRef};
use crate::response::ResponseHandlerRef;

/// Index of a node in the tree arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// The root node's id.
    pub const ROOT: Self = Self(0);
}

/// Index of an executable command in the leaf arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ExecutableId(usize);

impl ExecutableId {
    pub(crate) const fn new(index: usize) -> Self {
        Self(index)
    }

    /// The arena index, stable for the lifetime of the registration.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A literal tree node: canonical spelling plus lowercase for matching.
#[derive(Clone, Debug)]
pub struct LiteralNode {
    spelling: String,
    lowercase: String,
    aliases: Vec<String>,
}

impl LiteralNode {
    fn new(spelling: &str) -> Self {
        Self {
            spelling: spelling.to_string(),
            lowercase: spelling.to_lowercase(),
            aliases: Vec::new(),
        }
    }

    /// The canonical (first-registered) spelling.
    #[must_use]
    pub fn spelling(&self) -> &str {
        &self.spelling
    }

    /// Alternative spellings merged into this node.
    #[must_use]
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// True if the token matches this literal, case-insensitively.
    #[must_use]
    pub fn matches(&self, token: &str) -> bool {
        self.lowercase == token.to_lowercase()
    }
}

pub(crate) enum NodeKind<A: Actor> {
    Root,
    Literal(LiteralNode),
    Parameter(Arc<IngestedParameter<A>>),
}

pub(crate) struct Node<A: Actor> {
    pub kind: NodeKind<A>,
    pub children: Vec<NodeId>,
    pub executable: Option<ExecutableId>,
}

impl<A: Actor> Node<A> {
    fn new(kind: NodeKind<A>) -> Self {
        Self {
            kind,
            children: Vec::new(),
            executable: None,
        }
    }
}

/// A leaf binding a full path to one handler.
pub struct ExecutableCommand<A: Actor> {
    id: ExecutableId,
    path: CommandPath,
    pub(crate) parameters: Vec<Arc<IngestedParameter<A>>>,
    pub(crate) context_params: Vec<(String, ContextResolverRef<A>)>,
    pub(crate) handler: CommandHandler<A>,
    pub(crate) permission: Option<PermissionRef<A>>,
    pub(crate) conditions: Vec<ConditionRef<A>>,
    annotations: AnnotationList,
    cooldown: Option<Duration>,
    description: Option<String>,
    pub(crate) response: ResponseHandlerRef<A>,
    registration_index: usize,
}

impl<A: Actor> ExecutableCommand<A> {
    /// This command's leaf id.
    #[must_use]
    pub fn id(&self) -> ExecutableId {
        self.id
    }

    /// The full declared path, placeholders included.
    #[must_use]
    pub fn path(&self) -> &CommandPath {
        &self.path
    }

    /// The command's annotations, frozen at registration.
    #[must_use]
    pub fn annotations(&self) -> &AnnotationList {
        &self.annotations
    }

    /// The cooldown duration from the command's annotation, if any.
    #[must_use]
    pub fn cooldown(&self) -> Option<Duration> {
        self.cooldown
    }

    /// The command's description, if declared.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Order of registration, used as the final ranking tie-breaker.
    #[must_use]
    pub fn registration_index(&self) -> usize {
        self.registration_index
    }

    /// Usage line: the path followed by parameters not shown in it.
    #[must_use]
    pub fn usage(&self) -> String {
        let mut usage = self.path.to_string();
        for parameter in self.parameters.iter().skip(self.path.placeholders().count()) {
            let param = &parameter.param;
            if param.fillable_without_input() {
                usage.push_str(&format!(" [{}]", param.name));
            } else {
                usage.push_str(&format!(" <{}>", param.name));
            }
        }
        usage
    }

    /// The sum of parser priority scores, used for candidate ranking.
    #[must_use]
    pub(crate) fn priority_sum(&self) -> i32 {
        self.parameters
            .iter()
            .map(|p| p.parser.priority().score())
            .sum()
    }
}

impl<A: Actor> fmt::Debug for ExecutableCommand<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExecutableCommand({})", self.usage())
    }
}

/// The trie of all registered commands.
pub struct CommandTree<A: Actor> {
    nodes: Vec<Option<Node<A>>>,
    executables: Vec<Option<ExecutableCommand<A>>>,
    next_registration: usize,
}

impl<A: Actor> CommandTree<A> {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Some(Node::new(NodeKind::Root))],
            executables: Vec::new(),
            next_registration: 0,
        }
    }

    /// Installs an ingested command, creating nodes as needed.
    ///
    /// # Errors
    ///
    /// Fails with `DuplicateCommand` when a command with the same path
    /// shape and parameter type sequence is already installed.
    pub(crate) fn insert(&mut self, command: IngestedCommand<A>) -> Result<ExecutableId> {
        self.check_conflict(&command)?;

        let mut current = NodeId::ROOT;
        let mut parameters = Vec::new();

        for element in &command.chain {
            current = match element {
                ChainElement::Literal(text) => self.literal_child(current, text),
                ChainElement::Parameter(parameter) => {
                    parameters.push(Arc::clone(parameter));
                    self.parameter_child(current, parameter)
                }
            };
        }

        if self.node(current).executable.is_some() {
            return Err(Error::duplicate_command(command.path.to_string()));
        }

        let id = ExecutableId(self.executables.len());
        let registration_index = self.next_registration;
        self.next_registration += 1;
        self.executables.push(Some(ExecutableCommand {
            id,
            path: command.path,
            parameters,
            context_params: command.context_params,
            handler: command.handler,
            permission: command.permission,
            conditions: command.conditions,
            annotations: command.annotations,
            cooldown: command.cooldown,
            description: command.description,
            response: command.response,
            registration_index,
        }));
        self.node_mut(current).executable = Some(id);
        Ok(id)
    }

    /// Removes a command and prunes branches left empty.
    pub(crate) fn remove(&mut self, id: ExecutableId) -> bool {
        if self
            .executables
            .get_mut(id.0)
            .and_then(Option::take)
            .is_none()
        {
            return false;
        }
        self.detach(NodeId::ROOT, id);
        true
    }

    /// Every installed command whose path starts with the given prefix.
    pub(crate) fn matching_prefix(&self, prefix: &CommandPath) -> Vec<ExecutableId> {
        self.executables()
            .filter(|exec| prefix.matches_prefix(exec.path()))
            .map(ExecutableCommand::id)
            .collect()
    }

    /// Live commands in registration order.
    pub fn executables(&self) -> impl Iterator<Item = &ExecutableCommand<A>> {
        self.executables.iter().filter_map(Option::as_ref)
    }

    /// Looks up a live command by id.
    #[must_use]
    pub fn get(&self, id: ExecutableId) -> Option<&ExecutableCommand<A>> {
        self.executables.get(id.0).and_then(Option::as_ref)
    }

    /// Number of live commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.executables().count()
    }

    /// True if no commands are installed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node<A> {
        self.nodes[id.0].as_ref().expect("live node")
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node<A> {
        self.nodes[id.0].as_mut().expect("live node")
    }

    fn literal_child(&mut self, parent: NodeId, text: &str) -> NodeId {
        let lowercase = text.to_lowercase();
        let existing = self.node(parent).children.iter().copied().find(|&child| {
            matches!(&self.node(child).kind, NodeKind::Literal(l) if l.lowercase == lowercase)
        });

        if let Some(child) = existing {
            if let NodeKind::Literal(literal) = &mut self.node_mut(child).kind {
                if literal.spelling != text && !literal.aliases.iter().any(|a| a == text) {
                    literal.aliases.push(text.to_string());
                }
            }
            return child;
        }
        self.push_child(parent, NodeKind::Literal(LiteralNode::new(text)))
    }

    fn parameter_child(&mut self, parent: NodeId, parameter: &Arc<IngestedParameter<A>>) -> NodeId {
        let existing = self.node(parent).children.iter().copied().find(|&child| {
            match &self.node(child).kind {
                NodeKind::Parameter(p) => {
                    p.param.name == parameter.param.name
                        && p.param.ty == parameter.param.ty
                        && Arc::ptr_eq(&p.parser, &parameter.parser)
                }
                _ => false,
            }
        });
        if let Some(child) = existing {
            return child;
        }
        self.push_child(parent, NodeKind::Parameter(Arc::clone(parameter)))
    }

    fn push_child(&mut self, parent: NodeId, kind: NodeKind<A>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(Node::new(kind)));
        self.node_mut(parent).children.push(id);
        id
    }

    /// Clears `id` from the subtree and prunes empty descendants.
    /// Returns true if `node` itself became removable.
    fn detach(&mut self, node: NodeId, id: ExecutableId) -> bool {
        if self.node(node).executable == Some(id) {
            self.node_mut(node).executable = None;
        }

        let children = self.node(node).children.clone();
        for child in children {
            if self.detach(child, id) {
                self.nodes[child.0] = None;
                self.node_mut(node).children.retain(|&c| c != child);
            }
        }

        let current = self.node(node);
        node != NodeId::ROOT && current.executable.is_none() && current.children.is_empty()
    }

    fn check_conflict(&self, command: &IngestedCommand<A>) -> Result<()> {
        let new_types: Vec<_> = command
            .chain
            .iter()
            .filter_map(|e| match e {
                ChainElement::Parameter(p) => Some(p.param.ty.clone()),
                ChainElement::Literal(_) => None,
            })
            .collect();

        for existing in self.executables() {
            if !paths_conflict(existing.path(), &command.path) {
                continue;
            }
            let existing_types: Vec<_> = existing
                .parameters
                .iter()
                .map(|p| p.param.ty.clone())
                .collect();
            if existing_types == new_types {
                return Err(Error::duplicate_command(command.path.to_string()));
            }
        }
        Ok(())
    }
}

impl<A: Actor> Default for CommandTree<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Actor> fmt::Debug for CommandTree<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CommandTree({} commands)", self.len())
    }
}

/// Paths conflict when they have the same shape: equal length, literals
/// equal case-insensitively, placeholders in the same positions
/// (placeholder names do not disambiguate).
fn paths_conflict(a: &CommandPath, b: &CommandPath) -> bool {
    a.len() == b.len()
        && a.segments().iter().zip(b.segments()).all(|(x, y)| match (x, y) {
            (Segment::Literal(l), Segment::Literal(r)) => l.eq_ignore_ascii_case(r),
            (Segment::Placeholder(_), Segment::Placeholder(_)) => true,
            _ => false,
        })
}
