pub mod todo;
pub mod user;

pub use todo::{
    DataResponse, IdResponse, ItemInput, ItemUpdate, ListInput, ListUpdate, ResourceKind,
    StatusResponse, TodoItem, TodoList,
};
pub use user::{NewUser, SignInRequest, SignUpRequest, SignUpResponse, TokenResponse, User, UserId};
