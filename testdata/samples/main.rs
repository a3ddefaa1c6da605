fn main() {
    println!("grown in a catalog, classified by one");
}
