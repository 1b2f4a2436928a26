//! Request task bookkeeping.
//!
//! Every request the reducer asks for gets a fresh `TaskId`. Results carry
//! the id back, and only the latest active task of a kind is applied.
//! Clearing a kind (e.g. on logout) turns any late result into a no-op.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub u64);

#[derive(Debug, Default)]
pub struct TaskSeq {
    next: u64,
}

impl TaskSeq {
    pub fn next_id(&mut self) -> TaskId {
        let id = TaskId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    Login,
    Register,
    FetchUsers,
    MutateUser,
}

#[derive(Debug)]
pub struct TaskCompleted<E> {
    pub id: TaskId,
    pub result: E,
}

/// Task lifecycle state (stored in AppState, mutated only by reducer).
#[derive(Debug, Default, Clone)]
pub struct TaskState {
    pub active: Option<TaskId>,
}

impl TaskState {
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn start(&mut self, id: TaskId) {
        self.active = Some(id);
    }

    pub fn finish_if_active(&mut self, id: TaskId) -> bool {
        let ok = self.active == Some(id);
        if ok {
            self.active = None;
        }
        ok
    }

    pub fn clear(&mut self) {
        self.active = None;
    }
}

#[derive(Debug, Default, Clone)]
pub struct Tasks {
    pub login: TaskState,
    pub register: TaskState,
    pub fetch_users: TaskState,
    pub mutate_user: TaskState,
}

impl Tasks {
    pub fn state(&self, kind: TaskKind) -> &TaskState {
        match kind {
            TaskKind::Login => &self.login,
            TaskKind::Register => &self.register,
            TaskKind::FetchUsers => &self.fetch_users,
            TaskKind::MutateUser => &self.mutate_user,
        }
    }

    pub fn state_mut(&mut self, kind: TaskKind) -> &mut TaskState {
        match kind {
            TaskKind::Login => &mut self.login,
            TaskKind::Register => &mut self.register,
            TaskKind::FetchUsers => &mut self.fetch_users,
            TaskKind::MutateUser => &mut self.mutate_user,
        }
    }

    pub fn is_any_running(&self) -> bool {
        self.login.is_running()
            || self.register.is_running()
            || self.fetch_users.is_running()
            || self.mutate_user.is_running()
    }

    /// Forgets every in-flight task.
    pub fn clear_all(&mut self) {
        self.login.clear();
        self.register.clear();
        self.fetch_users.clear();
        self.mutate_user.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_latest_task_finishes() {
        let mut seq = TaskSeq::default();
        let mut tasks = Tasks::default();
        let first = seq.next_id();
        let second = seq.next_id();

        tasks.state_mut(TaskKind::FetchUsers).start(first);
        tasks.state_mut(TaskKind::FetchUsers).start(second);
        assert!(!tasks.state_mut(TaskKind::FetchUsers).finish_if_active(first));
        assert!(tasks.state_mut(TaskKind::FetchUsers).finish_if_active(second));
        assert!(!tasks.is_any_running());
    }

    #[test]
    fn cleared_task_ignores_result() {
        let mut tasks = Tasks::default();
        tasks.state_mut(TaskKind::MutateUser).start(TaskId(7));
        tasks.clear_all();
        assert!(!tasks.state_mut(TaskKind::MutateUser).finish_if_active(TaskId(7)));
    }
}
