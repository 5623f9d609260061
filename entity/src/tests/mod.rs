mod test_entity;
