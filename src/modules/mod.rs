pub mod books;
pub mod rentals;
pub mod users;

use std::sync::Arc;

use bookrent_kernel::ModuleRegistry;
use bookrent_ledger::RentalDesk;

/// Register every module; all of them share the one rental desk
pub fn register_all(registry: &mut ModuleRegistry, desk: Arc<RentalDesk>) {
    registry.register(books::create_module(Arc::clone(&desk)));
    registry.register(users::create_module(Arc::clone(&desk)));
    registry.register(rentals::create_module(desk));
}
