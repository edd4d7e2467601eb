mod password;
mod shopping_list;
mod token;
mod token_store;
mod user;

pub use self::{password::*, shopping_list::*, token::*, token_store::*, user::*};
