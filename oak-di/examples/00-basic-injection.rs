use oak_di::argument::{Argument, ArgumentKey};
use oak_di::binding::Implementation;
use oak_di::container::{Container, ServiceContainerBuilder, TypedContainer};
use oak_di::contract::Contract;
use oak_di::instance::{Instance, InstancePtr};
use oak_di::Component;

// this is a trait we would like to use in our component
trait Greeter {
    fn greet(&self, name: &str) -> String;
}

// a simple component without any dependencies
#[derive(Component)]
struct EnglishGreeter;

impl Greeter for EnglishGreeter {
    fn greet(&self, name: &str) -> String {
        format!("Hello {name}!")
    }
}

// a component with a service dependency and a value parameter
#[derive(Component)]
struct Reception {
    // services are resolved from the container
    greeter: InstancePtr<dyn Greeter + Send + Sync>,
    // values need to be supplied as arguments or have a default
    guest: String,
}

impl Reception {
    fn welcome(&self) {
        println!("{}", self.greeter.greet(&self.guest));
    }
}

//noinspection DuplicatedCode
// note: for the sake of simplicity, errors are unwrapped, rather than gracefully handled
fn main() {
    // ServiceContainerBuilder creates a container which knows all derived components
    let mut container = ServiceContainerBuilder::new()
        .expect("error initializing ServiceContainerBuilder")
        .build();

    // traits need an explicit binding - a singleton factory shares a single greeter
    container.singleton(
        Contract::of::<dyn Greeter + Send + Sync>(),
        Implementation::factory(|container| {
            let greeter = container.get_typed::<EnglishGreeter>()?;
            Ok(Instance::new(greeter as InstancePtr<dyn Greeter + Send + Sync>))
        }),
    );

    // whenever Reception is created, use this guest
    container.when_asks_give(
        Contract::of::<Reception>(),
        ArgumentKey::from("guest"),
        Argument::value("world".to_string()),
    );

    let reception = container
        .get_typed::<Reception>()
        .expect("error creating Reception");

    // prints "Hello world!"
    reception.welcome();
}
