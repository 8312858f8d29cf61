use setter_builder_derive::setter_builder;

#[derive(Debug, Default)]
pub struct Person {
    name: String,
    height: u32,
    age: u32,
}

#[setter_builder]
impl Person {
    #[builder_property]
    pub fn set_name(&mut self, name: String) {
        self.name = name;
    }

    #[builder_property]
    pub fn set_height(&mut self, height: u32) {
        self.height = height;
    }

    #[builder_property]
    pub fn set_age(&mut self, age: u32) {
        self.age = age;
    }
}

fn main() {
    println!("=== Setter Builder Example ===\n");

    let person = Person::builder()
        .set_name("alice".to_string())
        .set_height(170)
        .set_age(30)
        .build();
    println!("Built with every setter: {:?}", person);

    let partial = Person::builder().set_name("bob".to_string()).build();
    println!("Unset values keep their defaults: {:?}", partial);
}
