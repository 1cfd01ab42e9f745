mod common;

use std::rc::Rc;

use chart_bind::api::{BindingId, BindingOptions, BindingSelector};
use chart_bind::core::SharedCollection;
use proptest::prelude::*;

use common::{GenericCollection, generic, recording_setup, shared};

#[test]
fn exactly_one_subscription_while_any_binding_remains() {
    let (_view, mut coordinator) = recording_setup();
    let collection = generic();
    let handle = shared(&collection);

    let first = coordinator
        .register(&handle, None, BindingOptions::default())
        .expect("register");
    let second = coordinator
        .register(&handle, None, BindingOptions::default())
        .expect("register");
    assert_eq!(collection.listener_total(), 6);

    coordinator.remove(&BindingSelector::ById(first));
    assert_eq!(collection.listener_total(), 6);

    coordinator.remove(&BindingSelector::ById(second));
    assert_eq!(collection.listener_total(), 0);
}

#[derive(Debug, Clone)]
enum Op {
    Register { collection: usize },
    RemoveNthId { nth: usize },
    RemoveCollection { collection: usize },
    Clear,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0usize..3).prop_map(|collection| Op::Register { collection }),
        3 => (0usize..8).prop_map(|nth| Op::RemoveNthId { nth }),
        2 => (0usize..3).prop_map(|collection| Op::RemoveCollection { collection }),
        1 => Just(Op::Clear),
    ]
}

proptest! {
    // For every register/remove sequence, a collection carries exactly one
    // installed subscription while at least one binding references it, and
    // none otherwise. Checked both from the registry's side and from the
    // collection's own listener bookkeeping.
    #[test]
    fn subscription_count_tracks_binding_references(
        ops in proptest::collection::vec(op_strategy(), 1..40)
    ) {
        let (_view, mut coordinator) = recording_setup();
        let pool: Vec<Rc<GenericCollection>> = (0..3).map(|_| generic()).collect();
        let handles: Vec<SharedCollection> = pool.iter().map(|collection| shared(collection)).collect();

        for op in ops {
            match op {
                Op::Register { collection } => {
                    coordinator
                        .register(&handles[collection], None, BindingOptions::default())
                        .expect("capable collection");
                }
                Op::RemoveNthId { nth } => {
                    let mut ids: Vec<BindingId> = Vec::new();
                    coordinator.for_each(|id, _, _, _| ids.push(id.clone()));
                    if !ids.is_empty() {
                        let id = ids[nth % ids.len()].clone();
                        coordinator.remove(&BindingSelector::ById(id));
                    }
                }
                Op::RemoveCollection { collection } => {
                    coordinator.remove(&BindingSelector::collection(&handles[collection]));
                }
                Op::Clear => coordinator.clear(),
            }

            for (collection, handle) in pool.iter().zip(&handles) {
                let referenced = !coordinator.ids_for(handle).is_empty();
                let expected = if referenced { 6 } else { 0 };
                prop_assert_eq!(coordinator.subscription_count(handle), expected);
                prop_assert_eq!(collection.listener_total(), expected);
            }
        }
    }
}
