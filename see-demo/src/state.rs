use see_data::EntityRepository;

use crate::models::Member;

/// Shared handler state: the member repository over provider `P`.
#[derive(Clone)]
pub struct AppState<P> {
    pub members: EntityRepository<Member, P>,
}

impl<P> AppState<P>
where
    P: see_data::EntityProvider<Member>,
{
    pub fn new(provider: P) -> Self {
        Self {
            members: EntityRepository::new(provider),
        }
    }
}
