//! Presentation state holder for the to-do list.
//!
//! # Responsibility
//! - Mirror the repository's live list for the view, starting from empty.
//! - Accept insert/update/delete requests without blocking the caller.
//!
//! # Invariants
//! - Every background task belongs to the holder: dropping the holder
//!   aborts the collector and all unfinished mutations.
//! - Failed mutations are logged and dropped; nothing is retried.

use crate::model::todo::Todo;
use crate::repo::todo_repository::TodoRepository;
use crate::store::{TodoStore, TodoSubscription};
use log::{debug, info, warn};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};

#[derive(Debug)]
enum Mutation {
    Insert(Todo),
    Update(Todo),
    Delete(Todo),
}

impl Mutation {
    fn name(&self) -> &'static str {
        match self {
            Self::Insert(_) => "insert",
            Self::Update(_) => "update",
            Self::Delete(_) => "delete",
        }
    }

    async fn apply<S: TodoStore>(self, repository: &TodoRepository<S>) {
        let op = self.name();
        let result = match self {
            Self::Insert(todo) => repository.insert(todo).await.map(|_| ()),
            Self::Update(todo) => repository.update(todo).await,
            Self::Delete(todo) => repository.delete(todo).await,
        };

        match result {
            Ok(()) => debug!("event=todo_{op} module=presentation status=ok"),
            // No retry and no user-facing surface: the mutation is dropped.
            Err(err) => warn!("event=todo_{op} module=presentation status=dropped error={err}"),
        }
    }
}

/// Owns the live list shown by the view and the mutations it issues.
pub struct TodoStateHolder<S: TodoStore + 'static> {
    repository: Arc<TodoRepository<S>>,
    runtime: Handle,
    todos: watch::Receiver<Vec<Todo>>,
    collector: JoinHandle<()>,
    mutations: Mutex<JoinSet<()>>,
}

impl<S: TodoStore + 'static> TodoStateHolder<S> {
    /// Creates a holder whose background work runs on `runtime`.
    ///
    /// The live list starts empty and catches up once the collector has
    /// received the repository's first emission.
    pub fn new(repository: Arc<TodoRepository<S>>, runtime: Handle) -> Self {
        let (publisher, todos) = watch::channel(Vec::new());
        let mut source = repository.observe_all();

        let collector = runtime.spawn(async move {
            publisher.send_replace(source.current());
            while let Some(latest) = source.next().await {
                publisher.send_replace(latest);
            }
            debug!("event=todo_collect module=presentation status=source_closed");
        });

        Self {
            repository,
            runtime,
            todos,
            collector,
            mutations: Mutex::new(JoinSet::new()),
        }
    }

    /// Live list for rendering.
    pub fn todos(&self) -> TodoSubscription {
        TodoSubscription::new(self.todos.clone())
    }

    /// Schedules an insert and returns immediately.
    pub fn insert(&self, todo: Todo) {
        self.schedule(Mutation::Insert(todo));
    }

    /// Schedules an update and returns immediately.
    pub fn update(&self, todo: Todo) {
        self.schedule(Mutation::Update(todo));
    }

    /// Schedules a delete and returns immediately.
    pub fn delete(&self, todo: Todo) {
        self.schedule(Mutation::Delete(todo));
    }

    /// Number of scheduled mutations that have not finished yet.
    pub fn pending_mutations(&self) -> usize {
        let mut tasks = self.mutations.lock();
        reap_finished(&mut tasks);
        tasks.len()
    }

    /// Waits until every mutation scheduled so far has finished.
    ///
    /// Used by front ends that want their last actions persisted before
    /// tearing the holder down.
    pub async fn finish_pending(&self) {
        let mut tasks = std::mem::take(&mut *self.mutations.lock());
        while let Some(joined) = tasks.join_next().await {
            log_join_failure(joined);
        }
    }

    fn schedule(&self, mutation: Mutation) {
        let op = mutation.name();
        let repository = Arc::clone(&self.repository);
        let mut tasks = self.mutations.lock();
        reap_finished(&mut tasks);
        tasks.spawn_on(
            async move { mutation.apply(&repository).await },
            &self.runtime,
        );
        debug!(
            "event=todo_{} module=presentation status=scheduled pending={}",
            op,
            tasks.len()
        );
    }
}

impl<S: TodoStore + 'static> Drop for TodoStateHolder<S> {
    fn drop(&mut self) {
        self.collector.abort();
        let mut tasks = self.mutations.lock();
        reap_finished(&mut tasks);
        if !tasks.is_empty() {
            info!(
                "event=state_holder_drop module=presentation status=cancelled pending={}",
                tasks.len()
            );
        }
        tasks.abort_all();
    }
}

fn reap_finished(tasks: &mut JoinSet<()>) {
    while let Some(joined) = tasks.try_join_next() {
        log_join_failure(joined);
    }
}

fn log_join_failure(joined: Result<(), tokio::task::JoinError>) {
    if let Err(err) = joined {
        if err.is_panic() {
            warn!("event=todo_mutation module=presentation status=panicked error={err}");
        }
    }
}
