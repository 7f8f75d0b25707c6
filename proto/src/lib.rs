pub mod kanban {
    tonic::include_proto!("kanban");
}

pub mod eventbus {
    tonic::include_proto!("eventbus");
}
